//! Medication CRUD entry points.
//!
//! Every mutation validates, writes to the store, then reconciles the
//! owner's reminders. Calls for the same owner are serialized so two
//! reconciles never interleave their cancel-all and schedule steps.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use super::error::ReminderError;
use super::scheduler::{ReconcileReport, ReminderScheduler};
use super::validation::{check_duplicate_name, validate_input};
use crate::models::{MedicationInput, MedicationRecord};
use crate::store::{with_store_timeout, StoreError};

pub struct MedicationService {
    scheduler: Arc<ReminderScheduler>,
    owner_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl MedicationService {
    pub fn new(scheduler: Arc<ReminderScheduler>) -> Self {
        Self {
            scheduler,
            owner_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn scheduler(&self) -> &Arc<ReminderScheduler> {
        &self.scheduler
    }

    /// Create a medication, or edit it when `input.id` is set, then
    /// reconcile reminders. Returns the record id.
    pub async fn upsert_medication(
        &self,
        owner_id: &str,
        input: &MedicationInput,
    ) -> Result<Uuid, ReminderError> {
        let draft = validate_input(input)?;

        let lock = self.owner_lock(owner_id);
        let _serialized = lock.lock().await;

        let existing = self.query(owner_id).await?;
        if let Some(id) = &input.id {
            if !existing.iter().any(|r| &r.id == id) {
                return Err(StoreError::NotFound(id.to_string()).into());
            }
        }
        check_duplicate_name(&existing, &draft, input.id.as_ref())?;

        let store = self.scheduler.store();
        let timeout = self.scheduler.config().store_timeout;
        let written = match input.id {
            Some(id) => with_store_timeout(timeout, store.update(&id, &draft))
                .await
                .map(|_| id),
            None => with_store_timeout(timeout, store.create(owner_id, &draft)).await,
        };
        let id = match written {
            Ok(id) => id,
            // Unique index caught a clash the pre-check missed.
            Err(StoreError::Conflict(_)) => {
                return Err(ReminderError::DuplicateName { name: draft.name })
            }
            Err(e @ StoreError::TimedOut { .. }) => {
                // The write may still land; keep reminders in step with whatever did.
                tracing::warn!(owner_id, error = %e, "Medication write timed out, reconciling anyway");
                if let Err(reconcile) = self.scheduler.reconcile_all(owner_id).await {
                    tracing::warn!(owner_id, error = %reconcile, "Reconcile after timed-out write failed");
                }
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            owner_id,
            medication_id = %id,
            edited = input.id.is_some(),
            "Medication saved"
        );

        self.scheduler.reconcile_all(owner_id).await?;
        Ok(id)
    }

    /// Delete a medication and reconcile. Unknown ids (or ids of another
    /// owner) leave the store untouched but still reconcile.
    pub async fn delete_medication(
        &self,
        owner_id: &str,
        medication_id: &Uuid,
    ) -> Result<ReconcileReport, ReminderError> {
        let lock = self.owner_lock(owner_id);
        let _serialized = lock.lock().await;

        let existing = self.query(owner_id).await?;
        if existing.iter().any(|r| &r.id == medication_id) {
            let store = self.scheduler.store();
            with_store_timeout(
                self.scheduler.config().store_timeout,
                store.delete(medication_id),
            )
            .await?;
            tracing::info!(owner_id, medication_id = %medication_id, "Medication deleted");
        } else {
            tracing::debug!(owner_id, medication_id = %medication_id, "Delete of unknown medication");
        }

        self.scheduler.reconcile_all(owner_id).await
    }

    /// The owner's medications ordered by reminder time, then name.
    pub async fn list_medications(&self, owner_id: &str) -> Result<Vec<MedicationRecord>, ReminderError> {
        let mut meds = self.query(owner_id).await?;
        meds.sort_by(|a, b| {
            a.time_of_day()
                .cmp(&b.time_of_day())
                .then_with(|| a.normalized_name().cmp(&b.normalized_name()))
        });
        Ok(meds)
    }

    /// Reconcile without a mutation, e.g. at startup or after login.
    pub async fn refresh_reminders(&self, owner_id: &str) -> Result<ReconcileReport, ReminderError> {
        let lock = self.owner_lock(owner_id);
        let _serialized = lock.lock().await;
        self.scheduler.reconcile_all(owner_id).await
    }

    async fn query(&self, owner_id: &str) -> Result<Vec<MedicationRecord>, ReminderError> {
        let store = self.scheduler.store();
        Ok(with_store_timeout(
            self.scheduler.config().store_timeout,
            store.query_by_owner(owner_id),
        )
        .await?)
    }

    fn owner_lock(&self, owner_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .owner_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(locks.entry(owner_id.to_string()).or_default())
    }
}
