//! Builds the application from configuration.

use fittrack_core::lookup::{CalorieNinjasClient, MockNutritionLookup, NutritionLookup};
use fittrack_core::{
    AppError, FitnessApp, LocalStorage, RestBackend, Session, SyncEngine, WeeklySchedule,
};

use crate::config::{Config, SyncConfig};

/// Opens the local store and attaches a sync engine when sync is configured.
pub fn open_app(config: &Config) -> Result<FitnessApp, AppError> {
    let storage = LocalStorage::new(config.data_dir.value.clone());
    let app = FitnessApp::open(storage.clone(), config.profile.value.clone())?;

    match sync_engine(&config.sync, storage)? {
        Some(engine) => Ok(app.with_sync(engine)),
        None => Ok(app),
    }
}

fn sync_engine(
    sync: &SyncConfig,
    storage: LocalStorage,
) -> Result<Option<SyncEngine>, AppError> {
    let (Some(url), Some(key), Some(user_id)) = (&sync.server_url, &sync.api_key, &sync.user_id)
    else {
        return Ok(None);
    };

    let backend = RestBackend::new(url, key).with_access_token(sync.access_token.clone());
    let engine = SyncEngine::new(
        Box::new(backend),
        Box::new(Session::signed_in(user_id)),
        storage,
        WeeklySchedule::default(),
    )?;
    Ok(Some(engine))
}

/// The configured nutrition lookup, or `None` if neither an API key nor mock
/// mode is set.
pub fn nutrition_lookup(config: &Config) -> Option<Box<dyn NutritionLookup>> {
    if config.nutrition_api.use_mock {
        return Some(Box::new(MockNutritionLookup));
    }
    config
        .nutrition_api
        .api_key
        .as_ref()
        .map(|key| Box::new(CalorieNinjasClient::new(key)) as Box<dyn NutritionLookup>)
}

/// Pulls remote changes before a read command.
///
/// Failures are logged and ignored; the CLI works offline.
pub async fn try_auto_pull(app: &mut FitnessApp, config: &Config) {
    if !config.sync.auto_sync {
        return;
    }
    let today = chrono::Local::now().date_naive();
    if let Some(result) = app.pull(today).await {
        if !result.success {
            tracing::warn!(error = ?result.error, "Auto-sync pull skipped");
        }
    }
}

/// Replays queued writes after a write command.
pub async fn try_auto_drain(app: &mut FitnessApp, config: &Config) {
    if !config.sync.auto_sync {
        return;
    }
    if let Some(result) = app.drain_queue().await {
        if !result.success {
            tracing::warn!(error = ?result.error, "Auto-sync drain skipped");
        }
    }
}
