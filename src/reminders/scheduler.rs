//! Reminder reconciliation.
//!
//! The installed trigger set is never patched. Every reconcile cancels all
//! triggers, re-reads the owner's records and installs one daily trigger
//! per record, so there is no record-to-handle mapping that could drift.
//!
//! Failure policy:
//! - cancel-all failure: logged, reconcile continues (duplicates beat no reminders)
//! - store failure: reconcile aborts, cancelled triggers stay cancelled
//! - per-record schedule failure: logged and reported, siblings still installed

use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use uuid::Uuid;

use super::error::ReminderError;
use super::text::build_daily_trigger;
use crate::config::ReminderConfig;
use crate::models::{MedicationRecord, TriggerHandle};
use crate::notify::{with_engine_timeout, NotificationEngine, SchedulingError};
use crate::store::{with_store_timeout, MedicationStore};

/// One trigger installed during a reconcile.
#[derive(Debug, Clone, Serialize)]
pub struct InstalledReminder {
    pub medication_id: Uuid,
    pub handle: TriggerHandle,
}

/// One record whose trigger could not be installed.
#[derive(Debug, Clone)]
pub struct ScheduleFailure {
    pub medication_id: Uuid,
    pub name: String,
    pub error: SchedulingError,
}

/// Outcome of a reconcile that reached the store.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// Set when cancel-all failed; stale triggers may still be installed.
    pub cancel_error: Option<SchedulingError>,
    pub installed: Vec<InstalledReminder>,
    pub failures: Vec<ScheduleFailure>,
}

impl ReconcileReport {
    /// Every record got a trigger and nothing stale survived.
    pub fn is_clean(&self) -> bool {
        self.cancel_error.is_none() && self.failures.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.installed.len() + self.failures.len()
    }
}

/// Keeps the notification engine in step with one owner's medications.
///
/// Not safe to run concurrently for the same owner; callers serialize
/// (see `MedicationService`).
pub struct ReminderScheduler {
    store: Arc<dyn MedicationStore>,
    engine: Arc<dyn NotificationEngine>,
    config: ReminderConfig,
}

impl ReminderScheduler {
    pub fn new(
        store: Arc<dyn MedicationStore>,
        engine: Arc<dyn NotificationEngine>,
        config: ReminderConfig,
    ) -> Self {
        Self {
            store,
            engine,
            config,
        }
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn MedicationStore> {
        &self.store
    }

    /// Replace every installed trigger with one daily trigger per record
    /// owned by `owner_id`.
    pub async fn reconcile_all(&self, owner_id: &str) -> Result<ReconcileReport, ReminderError> {
        let mut report = ReconcileReport::default();

        if let Err(e) = with_engine_timeout(self.config.engine_timeout, self.engine.cancel_all()).await {
            tracing::warn!(owner_id, error = %e, "Cancel-all failed, rescheduling anyway");
            report.cancel_error = Some(e);
        }

        let records = match with_store_timeout(
            self.config.store_timeout,
            self.store.query_by_owner(owner_id),
        )
        .await
        {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(owner_id, error = %e, "Reconcile aborted, medication list unavailable");
                return Err(e.into());
            }
        };

        let outcomes = join_all(records.iter().map(|record| self.install(record))).await;

        for (record, outcome) in records.iter().zip(outcomes) {
            match outcome {
                Ok(handle) => {
                    tracing::debug!(
                        owner_id,
                        medication_id = %record.id,
                        handle = %handle,
                        at = %record.time_of_day(),
                        "Reminder installed"
                    );
                    report.installed.push(InstalledReminder {
                        medication_id: record.id,
                        handle,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        owner_id,
                        medication_id = %record.id,
                        error = %e,
                        "Reminder could not be scheduled"
                    );
                    report.failures.push(ScheduleFailure {
                        medication_id: record.id,
                        name: record.name.clone(),
                        error: e,
                    });
                }
            }
        }

        tracing::info!(
            owner_id,
            installed = report.installed.len(),
            failed = report.failures.len(),
            cancel_failed = report.cancel_error.is_some(),
            "Reminders reconciled"
        );
        Ok(report)
    }

    async fn install(&self, record: &MedicationRecord) -> Result<TriggerHandle, SchedulingError> {
        let trigger = build_daily_trigger(record, self.config.locale.strings());
        with_engine_timeout(self.config.engine_timeout, self.engine.schedule(trigger)).await
    }
}
