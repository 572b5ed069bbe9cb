use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use super::{MedicationStore, StoreError};
use crate::db::{self, DatabaseError};
use crate::models::{MedicationDraft, MedicationRecord};

/// SQLite-backed medication store.
///
/// rusqlite connections are blocking, so every call runs on the tokio
/// blocking pool behind a shared mutex.
#[derive(Clone)]
pub struct SqliteMedicationStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMedicationStore {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(db::open_database(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(db::open_memory_database()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, DatabaseError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("connection lock poisoned".into()))?;
            op(&guard).map_err(StoreError::from)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("store task failed: {e}")))?
    }
}

#[async_trait]
impl MedicationStore for SqliteMedicationStore {
    async fn create(&self, owner_id: &str, draft: &MedicationDraft) -> Result<Uuid, StoreError> {
        let now = Utc::now();
        let record = MedicationRecord {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            name: draft.name.clone(),
            stomach_condition: draft.stomach_condition,
            alert_channel: draft.alert_channel,
            dose_amount: draft.dose_amount,
            reminder_time: draft.reminder_time,
            created_at: now,
            updated_at: now,
        };
        let id = record.id;
        self.with_conn(move |conn| db::insert_medication(conn, &record))
            .await?;
        Ok(id)
    }

    async fn update(&self, id: &Uuid, draft: &MedicationDraft) -> Result<(), StoreError> {
        let id = *id;
        let draft = draft.clone();
        self.with_conn(move |conn| db::update_medication(conn, &id, &draft, Utc::now()))
            .await
    }

    async fn delete(&self, id: &Uuid) -> Result<(), StoreError> {
        let id = *id;
        let removed = self.with_conn(move |conn| db::delete_medication(conn, &id)).await?;
        if !removed {
            tracing::debug!(medication_id = %id, "Delete of unknown medication ignored");
        }
        Ok(())
    }

    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<MedicationRecord>, StoreError> {
        let owner_id = owner_id.to_string();
        self.with_conn(move |conn| db::get_medications_by_owner(conn, &owner_id))
            .await
    }
}
