//! In-process notification engine driven by tokio timers.
//!
//! Each installed trigger is one task that sleeps until its next local fire
//! time and then emits a [`FiredNotification`] on the engine's channel.
//! Repeating triggers re-arm themselves; one-shots remove themselves after
//! firing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{NotificationEngine, SchedulingError};
use crate::models::{NotificationContent, NotificationTrigger, Recurrence, ScheduledTrigger, TriggerHandle};

/// Delay applied to one-shot triggers whose time has already passed.
const OVERDUE_ONE_SHOT_DELAY_SECS: i64 = 1;

/// A trigger that just went off.
#[derive(Debug, Clone, Serialize)]
pub struct FiredNotification {
    pub handle: TriggerHandle,
    pub content: NotificationContent,
    pub fired_at: NaiveDateTime,
}

struct Installed {
    trigger: NotificationTrigger,
    task: JoinHandle<()>,
}

type InstalledMap = Arc<Mutex<HashMap<TriggerHandle, Installed>>>;

pub struct LocalNotificationEngine {
    installed: InstalledMap,
    fired_tx: mpsc::UnboundedSender<FiredNotification>,
    max_pending: usize,
}

impl LocalNotificationEngine {
    /// Create an engine holding at most `max_pending` triggers. The
    /// receiver yields every notification as it fires.
    pub fn new(max_pending: usize) -> (Self, mpsc::UnboundedReceiver<FiredNotification>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let engine = Self {
            installed: Arc::new(Mutex::new(HashMap::new())),
            fired_tx,
            max_pending,
        };
        (engine, fired_rx)
    }

    pub fn pending_count(&self) -> usize {
        self.lock().map(|m| m.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TriggerHandle, Installed>>, SchedulingError> {
        self.installed
            .lock()
            .map_err(|_| SchedulingError::Engine("trigger table lock poisoned".into()))
    }
}

impl Drop for LocalNotificationEngine {
    fn drop(&mut self) {
        if let Ok(mut map) = self.installed.lock() {
            for (_, installed) in map.drain() {
                installed.task.abort();
            }
        }
    }
}

#[async_trait]
impl NotificationEngine for LocalNotificationEngine {
    async fn schedule(&self, trigger: NotificationTrigger) -> Result<TriggerHandle, SchedulingError> {
        trigger
            .recurrence
            .validate()
            .map_err(SchedulingError::InvalidTrigger)?;
        if trigger.content.title.trim().is_empty() {
            return Err(SchedulingError::InvalidTrigger("empty title".into()));
        }

        let now = Local::now().naive_local();
        let first_fire = match (&trigger.recurrence, trigger.recurrence.next_fire_after(now)) {
            (_, Some(at)) => at,
            (Recurrence::Once(_), None) => now + chrono::Duration::seconds(OVERDUE_ONE_SHOT_DELAY_SECS),
            (_, None) => {
                return Err(SchedulingError::InvalidTrigger(format!(
                    "{} never fires",
                    trigger.recurrence
                )))
            }
        };

        // Hold the table while spawning so a task that finishes immediately
        // cannot try to remove itself before it is inserted.
        let mut map = self.lock()?;
        if map.len() >= self.max_pending {
            return Err(SchedulingError::CapacityExceeded {
                limit: self.max_pending,
            });
        }

        let handle = TriggerHandle::generate();
        let task = tokio::spawn(run_trigger(
            handle.clone(),
            trigger.clone(),
            first_fire,
            Arc::clone(&self.installed),
            self.fired_tx.clone(),
        ));
        tracing::debug!(
            handle = %handle,
            recurrence = %trigger.recurrence,
            first_fire = %first_fire,
            "Trigger installed"
        );
        map.insert(handle.clone(), Installed { trigger, task });
        Ok(handle)
    }

    async fn cancel(&self, handle: &TriggerHandle) -> Result<(), SchedulingError> {
        if let Some(installed) = self.lock()?.remove(handle) {
            installed.task.abort();
        }
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), SchedulingError> {
        let mut map = self.lock()?;
        let count = map.len();
        for (_, installed) in map.drain() {
            installed.task.abort();
        }
        tracing::debug!(count, "All triggers cancelled");
        Ok(())
    }

    async fn list_scheduled(&self) -> Result<Vec<ScheduledTrigger>, SchedulingError> {
        let map = self.lock()?;
        Ok(map
            .iter()
            .map(|(handle, installed)| ScheduledTrigger {
                handle: handle.clone(),
                trigger: installed.trigger.clone(),
            })
            .collect())
    }
}

async fn run_trigger(
    handle: TriggerHandle,
    trigger: NotificationTrigger,
    first_fire: NaiveDateTime,
    installed: InstalledMap,
    fired_tx: mpsc::UnboundedSender<FiredNotification>,
) {
    let mut next = first_fire;
    loop {
        let wait = (next - Local::now().naive_local())
            .to_std()
            .unwrap_or(Duration::ZERO);
        tokio::time::sleep(wait).await;

        let fired = FiredNotification {
            handle: handle.clone(),
            content: trigger.content.clone(),
            fired_at: Local::now().naive_local(),
        };
        if fired_tx.send(fired).is_err() {
            tracing::debug!(handle = %handle, "Nobody listening for fired notifications");
        }

        // Re-arm from now so a late wake-up fires once, not once per missed day.
        let after = next.max(Local::now().naive_local());
        match trigger.recurrence.next_fire_after(after) {
            Some(at) => next = at,
            None => break,
        }
    }

    if let Ok(mut map) = installed.lock() {
        map.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;
    use crate::config::REMINDER_CHANNEL_ID;
    use crate::models::ReminderTime;

    fn content(title: &str) -> NotificationContent {
        NotificationContent {
            title: title.into(),
            body: "Take 1 of X".into(),
            sound: false,
            channel_id: REMINDER_CHANNEL_ID.into(),
            medication_id: None,
        }
    }

    fn daily(title: &str) -> NotificationTrigger {
        NotificationTrigger {
            content: content(title),
            recurrence: Recurrence::Daily(ReminderTime::new(8, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn schedule_and_list() {
        let (engine, _rx) = LocalNotificationEngine::new(8);
        let handle = engine.schedule(daily("Reminder: A")).await.unwrap();

        let listed = engine.list_scheduled().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].handle, handle);
        assert_eq!(listed[0].trigger.content.title, "Reminder: A");
    }

    #[tokio::test]
    async fn cancel_removes_one_trigger() {
        let (engine, _rx) = LocalNotificationEngine::new(8);
        let a = engine.schedule(daily("A")).await.unwrap();
        engine.schedule(daily("B")).await.unwrap();

        engine.cancel(&a).await.unwrap();
        engine.cancel(&a).await.unwrap();
        assert_eq!(engine.pending_count(), 1);
    }

    #[tokio::test]
    async fn cancel_all_clears_table() {
        let (engine, _rx) = LocalNotificationEngine::new(8);
        for name in ["A", "B", "C"] {
            engine.schedule(daily(name)).await.unwrap();
        }
        engine.cancel_all().await.unwrap();
        assert!(engine.list_scheduled().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn late_wake_fires_once_for_missed_days() {
        let now = Local::now().naive_local();
        let an_hour_ago = now - chrono::Duration::hours(1);
        let trigger = NotificationTrigger {
            content: content("Reminder: X"),
            recurrence: Recurrence::Daily(ReminderTime::from_timestamp(&an_hour_ago)),
        };
        let installed: InstalledMap = Arc::new(Mutex::new(HashMap::new()));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run_trigger(
            TriggerHandle::generate(),
            trigger,
            an_hour_ago - chrono::Duration::days(3),
            installed,
            tx,
        ));
        tokio::time::sleep(Duration::from_millis(300)).await;
        task.abort();

        let mut fired = 0;
        while rx.try_recv().is_ok() {
            fired += 1;
        }
        assert_eq!(fired, 1);
    }

    #[tokio::test]
    async fn capacity_is_enforced() {
        let (engine, _rx) = LocalNotificationEngine::new(2);
        engine.schedule(daily("A")).await.unwrap();
        engine.schedule(daily("B")).await.unwrap();
        let err = engine.schedule(daily("C")).await.unwrap_err();
        assert_eq!(err, SchedulingError::CapacityExceeded { limit: 2 });
    }

    #[tokio::test]
    async fn invalid_triggers_rejected() {
        let (engine, _rx) = LocalNotificationEngine::new(8);
        let weekly = NotificationTrigger {
            content: content("A"),
            recurrence: Recurrence::Weekly {
                weekdays: vec![],
                at: ReminderTime::new(8, 0).unwrap(),
            },
        };
        assert!(matches!(
            engine.schedule(weekly).await,
            Err(SchedulingError::InvalidTrigger(_))
        ));
        assert!(matches!(
            engine.schedule(daily("  ")).await,
            Err(SchedulingError::InvalidTrigger(_))
        ));
        assert_eq!(engine.pending_count(), 0);
    }

    #[tokio::test]
    async fn one_shot_fires_and_uninstalls() {
        let (engine, mut rx) = LocalNotificationEngine::new(8);
        let at = Local::now().naive_local() + chrono::Duration::milliseconds(50);
        let handle = engine
            .schedule(NotificationTrigger {
                content: content("Soon"),
                recurrence: Recurrence::Once(at),
            })
            .await
            .unwrap();

        let fired = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("notification should fire")
            .expect("channel open");
        assert_eq!(fired.handle, handle);
        assert_eq!(fired.content.title, "Soon");

        // The task removes itself right after sending.
        for _ in 0..50 {
            if engine.pending_count() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(engine.pending_count(), 0);
    }

    #[tokio::test]
    async fn cancelled_trigger_never_fires() {
        let (engine, mut rx) = LocalNotificationEngine::new(8);
        let at = Local::now().naive_local() + chrono::Duration::milliseconds(100);
        engine
            .schedule(NotificationTrigger {
                content: content("Cancelled"),
                recurrence: Recurrence::Once(at),
            })
            .await
            .unwrap();
        engine.cancel_all().await.unwrap();

        let result = tokio::time::timeout(Duration::from_millis(400), rx.recv()).await;
        assert!(result.is_err(), "cancelled trigger fired");
    }

    #[tokio::test]
    async fn weekly_trigger_accepted() {
        let (engine, _rx) = LocalNotificationEngine::new(8);
        let weekly = NotificationTrigger {
            content: content("Weekly"),
            recurrence: Recurrence::Weekly {
                weekdays: vec![Weekday::Sun, Weekday::Wed],
                at: ReminderTime::new(9, 0).unwrap(),
            },
        };
        engine.schedule(weekly).await.unwrap();
        assert_eq!(engine.pending_count(), 1);
    }
}
