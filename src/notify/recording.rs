use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{NotificationEngine, SchedulingError};
use crate::models::{NotificationTrigger, ScheduledTrigger, TriggerHandle};

/// One call observed by the recorder, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Schedule { title: String },
    Cancel(TriggerHandle),
    CancelAll,
}

/// Notification engine that only records what it is asked to do.
///
/// Used to unit-test reconciliation without timers. Failures can be
/// injected per title fragment, for cancel-all, or as a slow engine.
#[derive(Default)]
pub struct RecordingNotificationEngine {
    scheduled: Mutex<Vec<ScheduledTrigger>>,
    calls: Mutex<Vec<EngineCall>>,
    failing_titles: Mutex<Vec<String>>,
    fail_cancel_all: AtomicBool,
    schedule_delay: Mutex<Option<Duration>>,
}

impl RecordingNotificationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any trigger whose title contains `fragment`.
    pub fn fail_when_title_contains(&self, fragment: &str) {
        if let Ok(mut titles) = self.failing_titles.lock() {
            titles.push(fragment.to_string());
        }
    }

    /// Make `cancel_all` fail without removing anything.
    pub fn set_cancel_all_fails(&self, fails: bool) {
        self.fail_cancel_all.store(fails, Ordering::SeqCst);
    }

    /// Delay each `schedule` call.
    pub fn set_schedule_delay(&self, delay: Option<Duration>) {
        if let Ok(mut guard) = self.schedule_delay.lock() {
            *guard = delay;
        }
    }

    /// Currently installed triggers.
    pub fn installed(&self) -> Vec<ScheduledTrigger> {
        self.scheduled.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Seed a trigger as if some earlier session had installed it.
    pub fn preinstall(&self, trigger: NotificationTrigger) -> TriggerHandle {
        let handle = TriggerHandle::generate();
        if let Ok(mut scheduled) = self.scheduled.lock() {
            scheduled.push(ScheduledTrigger {
                handle: handle.clone(),
                trigger,
            });
        }
        handle
    }

    fn record(&self, call: EngineCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl NotificationEngine for RecordingNotificationEngine {
    async fn schedule(&self, trigger: NotificationTrigger) -> Result<TriggerHandle, SchedulingError> {
        self.record(EngineCall::Schedule {
            title: trigger.content.title.clone(),
        });

        let delay = self.schedule_delay.lock().ok().and_then(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let rejected = self
            .failing_titles
            .lock()
            .map(|titles| titles.iter().any(|f| trigger.content.title.contains(f.as_str())))
            .unwrap_or(false);
        if rejected {
            return Err(SchedulingError::Rejected(format!(
                "refused '{}'",
                trigger.content.title
            )));
        }

        let handle = TriggerHandle::generate();
        self.scheduled
            .lock()
            .map_err(|_| SchedulingError::Engine("lock poisoned".into()))?
            .push(ScheduledTrigger {
                handle: handle.clone(),
                trigger,
            });
        Ok(handle)
    }

    async fn cancel(&self, handle: &TriggerHandle) -> Result<(), SchedulingError> {
        self.record(EngineCall::Cancel(handle.clone()));
        self.scheduled
            .lock()
            .map_err(|_| SchedulingError::Engine("lock poisoned".into()))?
            .retain(|s| &s.handle != handle);
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), SchedulingError> {
        self.record(EngineCall::CancelAll);
        if self.fail_cancel_all.load(Ordering::SeqCst) {
            return Err(SchedulingError::Engine("cancel-all refused".into()));
        }
        self.scheduled
            .lock()
            .map_err(|_| SchedulingError::Engine("lock poisoned".into()))?
            .clear();
        Ok(())
    }

    async fn list_scheduled(&self) -> Result<Vec<ScheduledTrigger>, SchedulingError> {
        Ok(self.installed())
    }
}
