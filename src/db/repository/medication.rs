use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::*;

const REMINDER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const SELECT_COLUMNS: &str = "SELECT id, owner_id, name, stomach_condition, alert_channel,
         dose_amount, reminder_time, created_at, updated_at
         FROM medications";

pub fn insert_medication(conn: &Connection, med: &MedicationRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medications (id, owner_id, name, normalized_name, stomach_condition,
         alert_channel, dose_amount, reminder_time, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            med.id.to_string(),
            med.owner_id,
            med.name,
            med.normalized_name(),
            med.stomach_condition.as_str(),
            med.alert_channel.as_str(),
            med.dose_amount,
            med.reminder_time.format(REMINDER_TIME_FORMAT).to_string(),
            med.created_at.to_rfc3339(),
            med.updated_at.to_rfc3339(),
        ],
    )
    .map_err(DatabaseError::classify)?;
    Ok(())
}

/// Overwrite the editable fields of a medication. Owner and creation time
/// never change.
pub fn update_medication(
    conn: &Connection,
    id: &Uuid,
    draft: &MedicationDraft,
    updated_at: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    let changed = conn
        .execute(
            "UPDATE medications SET name = ?2, normalized_name = ?3, stomach_condition = ?4,
             alert_channel = ?5, dose_amount = ?6, reminder_time = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                id.to_string(),
                draft.name,
                draft.normalized_name(),
                draft.stomach_condition.as_str(),
                draft.alert_channel.as_str(),
                draft.dose_amount,
                draft.reminder_time.format(REMINDER_TIME_FORMAT).to_string(),
                updated_at.to_rfc3339(),
            ],
        )
        .map_err(DatabaseError::classify)?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Medication".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Delete a medication. Returns whether a row was removed.
pub fn delete_medication(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let changed = conn.execute("DELETE FROM medications WHERE id = ?1", params![id.to_string()])?;
    Ok(changed > 0)
}

pub fn get_medication(conn: &Connection, id: &Uuid) -> Result<Option<MedicationRecord>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            params![id.to_string()],
            medication_row_from_rusqlite,
        )
        .optional()?;
    row.map(medication_from_row).transpose()
}

/// All medications of one owner, oldest first.
pub fn get_medications_by_owner(
    conn: &Connection,
    owner_id: &str,
) -> Result<Vec<MedicationRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} WHERE owner_id = ?1 ORDER BY created_at ASC, id ASC"
    ))?;

    let rows = stmt.query_map(params![owner_id], |row| Ok(medication_row_from_rusqlite(row)))?;

    let mut meds = Vec::new();
    for row in rows {
        meds.push(medication_from_row(row??)?);
    }
    Ok(meds)
}

struct MedicationRow {
    id: String,
    owner_id: String,
    name: String,
    stomach_condition: String,
    alert_channel: String,
    dose_amount: f64,
    reminder_time: String,
    created_at: String,
    updated_at: String,
}

fn medication_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<MedicationRow, rusqlite::Error> {
    Ok(MedicationRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        stomach_condition: row.get(3)?,
        alert_channel: row.get(4)?,
        dose_amount: row.get(5)?,
        reminder_time: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn medication_from_row(row: MedicationRow) -> Result<MedicationRecord, DatabaseError> {
    Ok(MedicationRecord {
        id: Uuid::parse_str(&row.id).map_err(|_| DatabaseError::InvalidId {
            field: "id".into(),
            value: row.id.clone(),
        })?,
        owner_id: row.owner_id,
        name: row.name,
        stomach_condition: StomachCondition::from_str(&row.stomach_condition)?,
        alert_channel: AlertChannel::from_str(&row.alert_channel)?,
        dose_amount: row.dose_amount,
        reminder_time: NaiveDateTime::parse_from_str(&row.reminder_time, REMINDER_TIME_FORMAT)
            .map_err(|_| DatabaseError::InvalidTimestamp {
                field: "reminder_time".into(),
                value: row.reminder_time.clone(),
            })?,
        created_at: parse_utc("created_at", &row.created_at)?,
        updated_at: parse_utc("updated_at", &row.updated_at)?,
    })
}

fn parse_utc(field: &str, value: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DatabaseError::InvalidTimestamp {
            field: field.into(),
            value: value.into(),
        })
}
