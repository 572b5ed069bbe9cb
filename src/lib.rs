pub mod config;
pub mod i18n;
pub mod models;
pub mod db;
pub mod store; // Medication persistence boundary
pub mod notify; // Notification engine boundary
pub mod reminders; // Validation, reminder text, reconciliation
pub mod auth;
pub mod assistant;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::ReminderConfig;
use crate::db::DatabaseError;
use crate::i18n::Locale;
use crate::notify::LocalNotificationEngine;
use crate::reminders::{MedicationService, ReminderError, ReminderScheduler};
use crate::store::SqliteMedicationStore;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("{} is not set; nothing to reconcile", config::ENV_OWNER)]
    MissingOwner,

    #[error("Cannot prepare data directory: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Reminders(#[from] ReminderError),
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Reminder daemon: rebuild the owner's reminders from the local store,
/// then report notifications as they fire until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let owner_id = std::env::var(config::ENV_OWNER)
        .ok()
        .filter(|o| !o.trim().is_empty())
        .ok_or(StartupError::MissingOwner)?;
    let locale = std::env::var(config::ENV_LOCALE)
        .map(|tag| Locale::from_tag(&tag))
        .unwrap_or_default();
    let reminder_config = ReminderConfig::default().with_locale(locale);

    std::fs::create_dir_all(config::app_data_dir())?;
    let db_path = config::database_path();
    let store = Arc::new(SqliteMedicationStore::open(&db_path)?);
    tracing::info!(path = %db_path.display(), "Medication store opened");

    let (engine, mut fired) = LocalNotificationEngine::new(reminder_config.max_pending_triggers);
    let engine = Arc::new(engine);

    let scheduler = Arc::new(ReminderScheduler::new(store, engine.clone(), reminder_config));
    let service = MedicationService::new(scheduler);

    let report = service.refresh_reminders(&owner_id).await?;
    if !report.is_clean() {
        for failure in &report.failures {
            tracing::warn!(name = %failure.name, error = %failure.error, "Reminder missing");
        }
    }
    tracing::info!(
        owner_id = %owner_id,
        pending = engine.pending_count(),
        locale = locale.as_str(),
        "Reminders active"
    );

    match config::AssistantConfig::from_env().map(|c| assistant::GeminiClient::from_config(&c)) {
        Some(Ok(client)) => tracing::info!(model = client.model(), "Assistant configured"),
        Some(Err(e)) => tracing::warn!(error = %e, "Assistant unavailable"),
        None => tracing::debug!("{} not set, assistant disabled", config::ENV_GEMINI_API_KEY),
    }

    loop {
        tokio::select! {
            Some(notification) = fired.recv() => {
                tracing::info!(
                    channel = %notification.content.channel_id,
                    sound = notification.content.sound,
                    at = %notification.fired_at,
                    "{}: {}",
                    notification.content.title,
                    notification.content.body
                );
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }
    Ok(())
}
