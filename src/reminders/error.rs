use thiserror::Error;

use crate::i18n::{fill, Locale};
use crate::store::StoreError;

/// Failures surfaced by medication mutations and reconciliation.
///
/// Validation variants are raised before any store call. Per-trigger
/// scheduling failures never appear here; they are collected in the
/// reconcile report instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReminderError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("A medication named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("Medication store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl ReminderError {
    /// Actionable message for the end user.
    pub fn user_message(&self, locale: Locale) -> String {
        let s = locale.strings();
        match self {
            ReminderError::MissingField("name") => s.missing_name.to_string(),
            ReminderError::MissingField(_) => s.missing_dose.to_string(),
            ReminderError::InvalidField { field: "dose_amount", .. } => s.invalid_dose.to_string(),
            ReminderError::InvalidField { .. } => s.invalid_value.to_string(),
            ReminderError::DuplicateName { name } => fill(s.duplicate_name, name, ""),
            ReminderError::StoreUnavailable(StoreError::NotFound(_)) => {
                s.medication_not_found.to_string()
            }
            ReminderError::StoreUnavailable(_) => s.store_unavailable.to_string(),
        }
    }

    /// Validation failures happen before any side effect.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ReminderError::MissingField(_)
                | ReminderError::InvalidField { .. }
                | ReminderError::DuplicateName { .. }
        )
    }
}
