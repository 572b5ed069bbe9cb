//! Medication store boundary.
//!
//! The reminder core only needs record CRUD plus a query by owner. Any
//! backend failure surfaces as a [`StoreError`], which the core propagates
//! unchanged.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryMedicationStore;
pub use sqlite::SqliteMedicationStore;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{MedicationDraft, MedicationRecord};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Medication store unavailable: {0}")]
    Unavailable(String),

    #[error("Medication store did not answer within {secs:.1}s")]
    TimedOut { secs: f64 },

    #[error("Medication not found: {0}")]
    NotFound(String),

    #[error("Medication store rejected the write: {0}")]
    Conflict(String),
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { id, .. } => StoreError::NotFound(id),
            DatabaseError::UniqueViolation(msg) => StoreError::Conflict(msg),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Persistent medication collection keyed by owner.
#[async_trait]
pub trait MedicationStore: Send + Sync {
    /// Persist a new record. The store assigns id and timestamps.
    async fn create(&self, owner_id: &str, draft: &MedicationDraft) -> Result<Uuid, StoreError>;

    /// Replace the editable fields of an existing record.
    async fn update(&self, id: &Uuid, draft: &MedicationDraft) -> Result<(), StoreError>;

    /// Remove a record. Deleting an unknown id is a no-op.
    async fn delete(&self, id: &Uuid) -> Result<(), StoreError>;

    /// Every record owned by `owner_id`.
    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<MedicationRecord>, StoreError>;
}

/// Bound a store call; expiry counts as the store being unavailable.
pub async fn with_store_timeout<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::TimedOut {
            secs: limit.as_secs_f64(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_trait_is_object_safe() {
        fn _assert_store(_: &dyn MedicationStore) {}
    }

    #[test]
    fn database_errors_map_to_store_taxonomy() {
        let not_found = StoreError::from(DatabaseError::NotFound {
            entity_type: "Medication".into(),
            id: "abc".into(),
        });
        assert_eq!(not_found, StoreError::NotFound("abc".into()));

        let conflict = StoreError::from(DatabaseError::UniqueViolation("unique".into()));
        assert!(matches!(conflict, StoreError::Conflict(_)));

        let other = StoreError::from(DatabaseError::MigrationFailed {
            version: 1,
            reason: "disk".into(),
        });
        assert!(matches!(other, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn slow_store_call_times_out() {
        let result: Result<(), StoreError> = with_store_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(StoreError::TimedOut { .. })));
    }

    #[tokio::test]
    async fn fast_store_call_passes_through() {
        let result = with_store_timeout(Duration::from_secs(1), async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(result, Ok(7));
    }
}
