//! Reminder text and trigger construction.
//!
//! Pure functions of a medication record and a string table: the same
//! record always renders the same title and body.

use crate::config::REMINDER_CHANNEL_ID;
use crate::i18n::{fill, Strings};
use crate::models::{
    MedicationRecord, NotificationContent, NotificationTrigger, Recurrence, StomachCondition,
};

/// Rendered notification text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderText {
    pub title: String,
    pub body: String,
}

/// Significant digits kept when a dose has a fractional part.
const DOSE_SIGNIFICANT_DIGITS: i32 = 6;

/// Display a dose without float noise: `500`, `0.5`, `2.25`, `0.0004`.
pub fn format_dose(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        return format!("{}", amount as i64);
    }
    let magnitude = amount.abs().log10().floor() as i32;
    let decimals = (DOSE_SIGNIFICANT_DIGITS - 1 - magnitude).clamp(0, 15) as usize;
    let fixed = format!("{amount:.decimals$}");
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Clause appended to the body for the stomach condition.
pub fn stomach_clause(condition: StomachCondition, strings: &Strings) -> &'static str {
    match condition {
        StomachCondition::NoPreference => "",
        StomachCondition::EmptyStomach => strings.clause_empty_stomach,
        StomachCondition::FullStomach => strings.clause_full_stomach,
    }
}

pub fn render_text(record: &MedicationRecord, strings: &Strings) -> ReminderText {
    let name = record.name.trim();
    let dose = format_dose(record.dose_amount);
    let title = fill(strings.reminder_title, name, &dose);
    let mut body = fill(strings.reminder_body, name, &dose);
    body.push_str(stomach_clause(record.stomach_condition, strings));
    ReminderText { title, body }
}

/// The daily trigger for one medication record.
pub fn build_daily_trigger(record: &MedicationRecord, strings: &Strings) -> NotificationTrigger {
    let ReminderText { title, body } = render_text(record, strings);
    NotificationTrigger {
        content: NotificationContent {
            title,
            body,
            sound: record.alert_channel.plays_sound(),
            channel_id: REMINDER_CHANNEL_ID.to_string(),
            medication_id: Some(record.id),
        },
        recurrence: Recurrence::Daily(record.time_of_day()),
    }
}
