use std::fmt;

use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AlertChannel, StomachCondition};

/// Wall-clock time of day a reminder recurs at (minute resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReminderTime {
    hour: u32,
    minute: u32,
}

impl ReminderTime {
    /// `None` unless `hour < 24` and `minute < 60`.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Keep only the hour and minute of a full timestamp.
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        Self {
            hour: ts.hour(),
            minute: ts.minute(),
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A persisted medication the owner wants to be reminded about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub stomach_condition: StomachCondition,
    pub alert_channel: AlertChannel,
    pub dose_amount: f64,
    /// Full timestamp as entered; only hour and minute drive recurrence.
    pub reminder_time: NaiveDateTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicationRecord {
    pub fn time_of_day(&self) -> ReminderTime {
        ReminderTime::from_timestamp(&self.reminder_time)
    }

    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Raw medication form fields. `id` is set when editing an existing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationInput {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub dose_amount: Option<f64>,
    pub stomach_condition: StomachCondition,
    pub alert_channel: AlertChannel,
    pub reminder_time: NaiveDateTime,
}

impl MedicationInput {
    pub fn new(name: &str, dose_amount: f64, reminder_time: NaiveDateTime) -> Self {
        Self {
            id: None,
            name: Some(name.to_string()),
            dose_amount: Some(dose_amount),
            stomach_condition: StomachCondition::default(),
            alert_channel: AlertChannel::default(),
            reminder_time,
        }
    }

    /// Turn this input into an edit of an existing record.
    pub fn editing(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_stomach_condition(mut self, condition: StomachCondition) -> Self {
        self.stomach_condition = condition;
        self
    }

    pub fn with_alert_channel(mut self, channel: AlertChannel) -> Self {
        self.alert_channel = channel;
        self
    }
}

/// Validated fields ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationDraft {
    pub name: String,
    pub stomach_condition: StomachCondition,
    pub alert_channel: AlertChannel,
    pub dose_amount: f64,
    pub reminder_time: NaiveDateTime,
}

impl MedicationDraft {
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Case- and whitespace-insensitive form of a medication name:
/// trimmed, inner whitespace runs collapsed, lowercased.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
