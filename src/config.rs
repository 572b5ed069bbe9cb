use std::path::PathBuf;
use std::time::Duration;

use crate::i18n::Locale;

/// Application-level constants
pub const APP_NAME: &str = "Medminder";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Notification channel every medication reminder is posted on.
pub const REMINDER_CHANNEL_ID: &str = "medication_reminders";

/// Default generative model for the chat assistant.
pub const DEFAULT_ASSISTANT_MODEL: &str = "gemini-2.5-flash";

/// Environment variables read at startup.
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_OWNER: &str = "MEDMINDER_OWNER";
pub const ENV_LOCALE: &str = "MEDMINDER_LOCALE";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,medminder_lib=debug"
}

/// Get the application data directory.
/// ~/Medminder/ when a home directory is known, ./Medminder otherwise.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the SQLite medication database.
pub fn database_path() -> PathBuf {
    app_data_dir().join("medications.db")
}

// ═══════════════════════════════════════════════════════════
// Reminder engine configuration
// ═══════════════════════════════════════════════════════════

/// Knobs for reconciliation and the local notification engine.
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// Upper bound on a single store call before it counts as unavailable.
    pub store_timeout: Duration,
    /// Upper bound on a single engine call (cancel-all or schedule).
    pub engine_timeout: Duration,
    /// Pending trigger limit of the local engine. Mobile platforms cap
    /// pending local notifications (iOS: 64).
    pub max_pending_triggers: usize,
    /// Language used for reminder text.
    pub locale: Locale,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(10),
            engine_timeout: Duration::from_secs(10),
            max_pending_triggers: 64,
            locale: Locale::En,
        }
    }
}

impl ReminderConfig {
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_timeouts(mut self, store: Duration, engine: Duration) -> Self {
        self.store_timeout = store;
        self.engine_timeout = engine;
        self
    }
}

/// Chat assistant settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl AssistantConfig {
    /// Read the assistant settings from the process environment.
    /// Returns `None` when no API key is configured.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`; a missing or blank key disables
    /// the assistant, a missing or blank model falls back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = lookup(ENV_GEMINI_API_KEY).filter(|k| !k.trim().is_empty())?;
        let model = lookup(ENV_GEMINI_MODEL)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ASSISTANT_MODEL.to_string());
        Some(Self {
            api_key,
            model,
            timeout_secs: 60,
        })
    }
}
