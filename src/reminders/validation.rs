use uuid::Uuid;

use super::error::ReminderError;
use crate::models::{normalize_name, MedicationDraft, MedicationInput, MedicationRecord};

/// Check required fields and turn raw input into a storable draft.
pub fn validate_input(input: &MedicationInput) -> Result<MedicationDraft, ReminderError> {
    let name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(ReminderError::MissingField("name"))?;

    let dose_amount = input
        .dose_amount
        .ok_or(ReminderError::MissingField("dose_amount"))?;
    if !dose_amount.is_finite() || dose_amount <= 0.0 {
        return Err(ReminderError::InvalidField {
            field: "dose_amount",
            reason: format!("must be a positive number, got {dose_amount}"),
        });
    }

    Ok(MedicationDraft {
        name: name.to_string(),
        stomach_condition: input.stomach_condition,
        alert_channel: input.alert_channel,
        dose_amount,
        reminder_time: input.reminder_time,
    })
}

/// Reject a draft whose normalized name matches another record of the
/// same owner. `editing` is excluded from the comparison.
pub fn check_duplicate_name(
    existing: &[MedicationRecord],
    draft: &MedicationDraft,
    editing: Option<&Uuid>,
) -> Result<(), ReminderError> {
    let wanted = normalize_name(&draft.name);
    let clash = existing
        .iter()
        .filter(|r| Some(&r.id) != editing)
        .any(|r| r.normalized_name() == wanted);
    if clash {
        return Err(ReminderError::DuplicateName {
            name: draft.name.clone(),
        });
    }
    Ok(())
}
