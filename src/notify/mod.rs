//! Notification engine boundary.
//!
//! The engine owns the device-wide set of scheduled triggers. The reminder
//! core talks to it only through [`NotificationEngine`], so the concrete
//! engine (tokio timers, platform SDK bridge, test recorder) is injected.

pub mod local;
pub mod recording;

pub use local::{FiredNotification, LocalNotificationEngine};
pub use recording::{EngineCall, RecordingNotificationEngine};

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NotificationTrigger, ScheduledTrigger, TriggerHandle};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulingError {
    #[error("Engine rejected the trigger: {0}")]
    Rejected(String),

    #[error("Invalid trigger: {0}")]
    InvalidTrigger(String),

    #[error("Too many pending notifications (limit {limit})")]
    CapacityExceeded { limit: usize },

    #[error("Notification engine did not answer within {secs:.1}s")]
    TimedOut { secs: f64 },

    #[error("Notification engine error: {0}")]
    Engine(String),
}

/// Device-level facility that fires alerts at wall-clock times.
#[async_trait]
pub trait NotificationEngine: Send + Sync {
    /// Install a trigger and return its handle.
    async fn schedule(&self, trigger: NotificationTrigger) -> Result<TriggerHandle, SchedulingError>;

    /// Remove one installed trigger. Unknown handles are ignored.
    async fn cancel(&self, handle: &TriggerHandle) -> Result<(), SchedulingError>;

    /// Remove every installed trigger, whoever scheduled it.
    async fn cancel_all(&self) -> Result<(), SchedulingError>;

    /// Snapshot of the installed triggers.
    async fn list_scheduled(&self) -> Result<Vec<ScheduledTrigger>, SchedulingError>;
}

/// Bound an engine call; expiry is reported as `SchedulingError::TimedOut`.
pub async fn with_engine_timeout<T, F>(limit: Duration, fut: F) -> Result<T, SchedulingError>
where
    F: Future<Output = Result<T, SchedulingError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(SchedulingError::TimedOut {
            secs: limit.as_secs_f64(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_trait_is_object_safe() {
        fn _assert_engine(_: &dyn NotificationEngine) {}
    }

    #[tokio::test]
    async fn hung_engine_call_times_out() {
        let result: Result<(), SchedulingError> =
            with_engine_timeout(Duration::from_millis(10), std::future::pending()).await;
        assert_eq!(result, Err(SchedulingError::TimedOut { secs: 0.01 }));
    }
}
