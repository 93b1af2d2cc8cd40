//! Wiring of configuration, store and pipeline

use std::sync::Arc;

use anyhow::Context;
use application::{ContentService, ports::ContentStorePort};
use infrastructure::{
    AppConfig, Database, InferenceScriptGenerator, SpeechSynthesizerAdapter, SqliteContentStore,
};
use tracing::debug;

/// Open the configured database and the content store on top of it
pub async fn open_store(
    config: &AppConfig,
) -> anyhow::Result<(Database, Arc<SqliteContentStore>)> {
    let db = Database::connect(&config.database)
        .await
        .with_context(|| format!("failed to open database {}", config.database.path))?;
    let store = Arc::new(SqliteContentStore::new(db.pool().clone()));
    debug!(path = %config.database.path, "Content store ready");
    Ok((db, store))
}

/// Build the content service from configuration
pub fn build_service(
    config: &AppConfig,
    store: Arc<dyn ContentStorePort>,
) -> anyhow::Result<ContentService> {
    let generator = InferenceScriptGenerator::new(config.inference.clone())
        .context("failed to set up script generation")?;
    let synthesizer = SpeechSynthesizerAdapter::new(config.speech.clone())
        .context("failed to set up speech synthesis")?;

    Ok(ContentService::with_config(
        store,
        Arc::new(generator),
        Arc::new(synthesizer),
        config.generation.to_service_config(),
    ))
}
