//! Repository layer: entity-scoped database operations.

mod medication;

pub use medication::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, Utc};
    use crate::db::sqlite::open_memory_database;
    use crate::db::DatabaseError;
    use crate::models::*;
    use rusqlite::Connection;
    use uuid::Uuid;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn eight_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn make_record(owner: &str, name: &str) -> MedicationRecord {
        let now = Utc::now();
        MedicationRecord {
            id: Uuid::new_v4(),
            owner_id: owner.into(),
            name: name.into(),
            stomach_condition: StomachCondition::EmptyStomach,
            alert_channel: AlertChannel::Both,
            dose_amount: 2.5,
            reminder_time: eight_am(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn insert_and_get_medication() {
        let conn = test_db();
        let med = make_record("user-1", "Metformin");
        insert_medication(&conn, &med).unwrap();

        let loaded = get_medication(&conn, &med.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Metformin");
        assert_eq!(loaded.owner_id, "user-1");
        assert_eq!(loaded.stomach_condition, StomachCondition::EmptyStomach);
        assert_eq!(loaded.alert_channel, AlertChannel::Both);
        assert_eq!(loaded.dose_amount, 2.5);
        assert_eq!(loaded.reminder_time, eight_am());
    }

    #[test]
    fn get_missing_medication_is_none() {
        let conn = test_db();
        assert!(get_medication(&conn, &Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn query_by_owner_filters_other_owners() {
        let conn = test_db();
        insert_medication(&conn, &make_record("user-1", "A")).unwrap();
        insert_medication(&conn, &make_record("user-1", "B")).unwrap();
        insert_medication(&conn, &make_record("user-2", "C")).unwrap();

        let meds = get_medications_by_owner(&conn, "user-1").unwrap();
        assert_eq!(meds.len(), 2);
        assert!(meds.iter().all(|m| m.owner_id == "user-1"));
    }

    #[test]
    fn normalized_name_unique_per_owner() {
        let conn = test_db();
        insert_medication(&conn, &make_record("user-1", " Aspirin ")).unwrap();

        let err = insert_medication(&conn, &make_record("user-1", "ASPIRIN")).unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)), "got {err:?}");

        // Another owner may use the same name
        insert_medication(&conn, &make_record("user-2", "aspirin")).unwrap();
    }

    #[test]
    fn update_changes_fields_and_keeps_owner() {
        let conn = test_db();
        let med = make_record("user-1", "Metformin");
        insert_medication(&conn, &med).unwrap();

        let draft = MedicationDraft {
            name: "Metformin XR".into(),
            stomach_condition: StomachCondition::FullStomach,
            alert_channel: AlertChannel::SilentNotification,
            dose_amount: 1000.0,
            reminder_time: eight_am() + chrono::Duration::hours(12),
        };
        update_medication(&conn, &med.id, &draft, Utc::now()).unwrap();

        let loaded = get_medication(&conn, &med.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Metformin XR");
        assert_eq!(loaded.owner_id, "user-1");
        assert_eq!(loaded.dose_amount, 1000.0);
        assert_eq!(loaded.time_of_day(), ReminderTime::new(20, 0).unwrap());
        assert_eq!(loaded.created_at, med.created_at);
    }

    #[test]
    fn update_missing_medication_is_not_found() {
        let conn = test_db();
        let draft = MedicationDraft {
            name: "Ghost".into(),
            stomach_condition: StomachCondition::NoPreference,
            alert_channel: AlertChannel::SilentNotification,
            dose_amount: 1.0,
            reminder_time: eight_am(),
        };
        let err = update_medication(&conn, &Uuid::new_v4(), &draft, Utc::now()).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn delete_reports_whether_row_existed() {
        let conn = test_db();
        let med = make_record("user-1", "A");
        insert_medication(&conn, &med).unwrap();

        assert!(delete_medication(&conn, &med.id).unwrap());
        assert!(!delete_medication(&conn, &med.id).unwrap());
        assert!(get_medications_by_owner(&conn, "user-1").unwrap().is_empty());
    }

    #[test]
    fn non_positive_dose_rejected_by_schema() {
        let conn = test_db();
        let mut med = make_record("user-1", "A");
        med.dose_amount = 0.0;
        let err = insert_medication(&conn, &med).unwrap_err();
        assert!(matches!(err, DatabaseError::Sqlite(_)), "got {err:?}");
    }

    #[test]
    fn reused_primary_key_is_not_a_unique_name_clash() {
        let conn = test_db();
        let med = make_record("user-1", "A");
        insert_medication(&conn, &med).unwrap();

        let mut same_id = make_record("user-1", "B");
        same_id.id = med.id;
        let err = insert_medication(&conn, &same_id).unwrap_err();
        assert!(matches!(err, DatabaseError::Sqlite(_)), "got {err:?}");
    }
}
