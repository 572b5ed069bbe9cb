use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::medication::ReminderTime;

/// When a trigger fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recurrence {
    /// A single local timestamp.
    Once(NaiveDateTime),
    /// Every day at the given local time.
    Daily(ReminderTime),
    /// On each listed weekday at the given local time.
    Weekly {
        weekdays: Vec<Weekday>,
        at: ReminderTime,
    },
}

impl Recurrence {
    /// Reject recurrences that can never fire.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Recurrence::Weekly { weekdays, .. } if weekdays.is_empty() => {
                Err("weekly recurrence needs at least one weekday".into())
            }
            _ => Ok(()),
        }
    }

    /// First fire time strictly after `now`, or `None` if the trigger is
    /// exhausted (a past one-shot, or a weekly rule with no weekdays).
    pub fn next_fire_after(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Recurrence::Once(at) => (*at > now).then_some(*at),
            Recurrence::Daily(at) => {
                let today = now.date().and_time(at.as_naive_time());
                if today > now {
                    Some(today)
                } else {
                    Some(today + Duration::days(1))
                }
            }
            Recurrence::Weekly { weekdays, at } => (0..=7)
                .map(|offset| (now.date() + Duration::days(offset)).and_time(at.as_naive_time()))
                .find(|candidate| candidate > &now && weekdays.contains(&candidate.weekday())),
        }
    }

    pub fn repeats(&self) -> bool {
        !matches!(self, Recurrence::Once(_))
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::Once(at) => write!(f, "once at {}", at.format("%Y-%m-%d %H:%M")),
            Recurrence::Daily(at) => write!(f, "daily at {at}"),
            Recurrence::Weekly { weekdays, at } => {
                let days: Vec<String> = weekdays.iter().map(|d| d.to_string()).collect();
                write!(f, "weekly on {} at {at}", days.join(","))
            }
        }
    }
}

/// What the user sees when a trigger fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    /// Ring with the default sound instead of posting silently.
    pub sound: bool,
    pub channel_id: String,
    /// Medication the reminder was rendered from, for tap-through.
    pub medication_id: Option<Uuid>,
}

/// A notification request handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTrigger {
    pub content: NotificationContent,
    pub recurrence: Recurrence,
}

/// Opaque engine-assigned identifier of an installed trigger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerHandle(pub String);

impl TriggerHandle {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for TriggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An installed trigger as reported by `list_scheduled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTrigger {
    pub handle: TriggerHandle,
    pub trigger: NotificationTrigger,
}
