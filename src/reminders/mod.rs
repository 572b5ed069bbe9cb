//! Medication reminders: validation, reminder text, reconciliation with
//! the notification engine, and the CRUD service tying them together.

pub mod error;
pub mod scheduler;
pub mod service;
pub mod text;
pub mod validation;

pub use error::ReminderError;
pub use scheduler::{InstalledReminder, ReconcileReport, ReminderScheduler, ScheduleFailure};
pub use service::MedicationService;
pub use text::{build_daily_trigger, format_dose, render_text, ReminderText};
pub use validation::{check_duplicate_name, validate_input};
