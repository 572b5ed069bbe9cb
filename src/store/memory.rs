use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{MedicationStore, StoreError};
use crate::models::{MedicationDraft, MedicationRecord};

/// In-process medication store for tests and previews.
///
/// Mirrors the SQLite store's rules (store-assigned ids, unique normalized
/// name per owner) and can simulate an unreachable or slow backend.
#[derive(Default)]
pub struct InMemoryMedicationStore {
    records: Mutex<HashMap<Uuid, MedicationRecord>>,
    unavailable: AtomicBool,
    latency: Mutex<Option<Duration>>,
    write_latency: Mutex<Option<Duration>>,
    writes: AtomicUsize,
}

impl InMemoryMedicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delay every subsequent call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        if let Ok(mut guard) = self.latency.lock() {
            *guard = latency;
        }
    }

    /// Extra delay applied only to create/update/delete.
    pub fn set_write_latency(&self, latency: Option<Duration>) {
        if let Ok(mut guard) = self.write_latency.lock() {
            *guard = latency;
        }
    }

    /// Number of successful create/update/delete calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored record, regardless of owner.
    pub fn all(&self) -> Vec<MedicationRecord> {
        self.lock()
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }

    async fn enter(&self) -> Result<(), StoreError> {
        let latency = self.latency.lock().ok().and_then(|l| *l);
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("backend unreachable".into()));
        }
        Ok(())
    }

    async fn enter_write(&self) -> Result<(), StoreError> {
        let latency = self.write_latency.lock().ok().and_then(|l| *l);
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        self.enter().await
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, MedicationRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }

    fn name_taken(
        records: &HashMap<Uuid, MedicationRecord>,
        owner_id: &str,
        draft: &MedicationDraft,
        except: Option<&Uuid>,
    ) -> bool {
        let wanted = draft.normalized_name();
        records.values().any(|r| {
            r.owner_id == owner_id && Some(&r.id) != except && r.normalized_name() == wanted
        })
    }
}

#[async_trait]
impl MedicationStore for InMemoryMedicationStore {
    async fn create(&self, owner_id: &str, draft: &MedicationDraft) -> Result<Uuid, StoreError> {
        self.enter_write().await?;
        let mut records = self.lock()?;
        if Self::name_taken(&records, owner_id, draft, None) {
            return Err(StoreError::Conflict(format!(
                "duplicate name for owner {owner_id}"
            )));
        }
        let now = Utc::now();
        let id = Uuid::new_v4();
        records.insert(
            id,
            MedicationRecord {
                id,
                owner_id: owner_id.to_string(),
                name: draft.name.clone(),
                stomach_condition: draft.stomach_condition,
                alert_channel: draft.alert_channel,
                dose_amount: draft.dose_amount,
                reminder_time: draft.reminder_time,
                created_at: now,
                updated_at: now,
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn update(&self, id: &Uuid, draft: &MedicationDraft) -> Result<(), StoreError> {
        self.enter_write().await?;
        let mut records = self.lock()?;
        let owner_id = match records.get(id) {
            Some(existing) => existing.owner_id.clone(),
            None => return Err(StoreError::NotFound(id.to_string())),
        };
        if Self::name_taken(&records, &owner_id, draft, Some(id)) {
            return Err(StoreError::Conflict(format!(
                "duplicate name for owner {owner_id}"
            )));
        }
        if let Some(record) = records.get_mut(id) {
            record.name = draft.name.clone();
            record.stomach_condition = draft.stomach_condition;
            record.alert_channel = draft.alert_channel;
            record.dose_amount = draft.dose_amount;
            record.reminder_time = draft.reminder_time;
            record.updated_at = Utc::now();
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), StoreError> {
        self.enter_write().await?;
        self.lock()?.remove(id);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<MedicationRecord>, StoreError> {
        self.enter().await?;
        let records = self.lock()?;
        let mut owned: Vec<MedicationRecord> = records
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{AlertChannel, StomachCondition};

    fn draft(name: &str) -> MedicationDraft {
        MedicationDraft {
            name: name.into(),
            stomach_condition: StomachCondition::NoPreference,
            alert_channel: AlertChannel::SilentNotification,
            dose_amount: 1.0,
            reminder_time: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = InMemoryMedicationStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.query_by_owner("u1").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.create("u1", &draft("A")).await.is_err());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn update_may_keep_its_own_name() {
        let store = InMemoryMedicationStore::new();
        let id = store.create("u1", &draft("Aspirin")).await.unwrap();
        store.update(&id, &draft("ASPIRIN")).await.unwrap();
        assert_eq!(store.all()[0].name, "ASPIRIN");
    }

    #[tokio::test]
    async fn owners_are_isolated() {
        let store = InMemoryMedicationStore::new();
        store.create("u1", &draft("A")).await.unwrap();
        store.create("u2", &draft("A")).await.unwrap();
        assert_eq!(store.query_by_owner("u1").await.unwrap().len(), 1);
        assert_eq!(store.query_by_owner("u3").await.unwrap().len(), 0);
    }
}
