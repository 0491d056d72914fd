//! Builds the gateway, store and service from a loaded config.

use adcopy_rs_config::{ServiceConfig, StoreConfig};
use adcopy_rs_core::{
    CompletionGateway, GenerationService, GenerationSettings, OpenAiGateway, RecordStore,
};
use adcopy_rs_server::AppState;
use adcopy_rs_store::{SqliteRecordStore, UnconfiguredRecordStore};
use anyhow::Context;
use log::{info, warn};
use std::sync::Arc;

/// Open the generation log named by the config.
///
/// A missing database url yields a store that reports `Unconfigured` on use;
/// a url that is present but cannot be opened is a startup error.
pub fn build_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    let Some(url) = config
        .database_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
    else {
        warn!("no database configured, history and persistence are disabled");
        return Ok(Arc::new(UnconfiguredRecordStore::default()));
    };
    let store = SqliteRecordStore::open(url).context("failed to open generation log")?;
    info!("generation log opened");
    Ok(Arc::new(store))
}

/// Build the generation service from a validated config.
pub fn build_service(config: &ServiceConfig) -> anyhow::Result<GenerationService> {
    let gateway = OpenAiGateway::from_config(&config.gateway)
        .context("failed to build completion gateway")?;
    if !gateway.is_configured() {
        warn!("no API key configured, generation requests will fail");
    }
    let store = build_store(&config.store)?;
    let settings = GenerationSettings::from_config(&config.gateway);
    info!(
        "generation service ready (model={}, timeout_secs={}, base_url={})",
        settings.model,
        settings.timeout.as_secs(),
        config.gateway.base_url
    );
    Ok(GenerationService::new(Arc::new(gateway), store, settings))
}

/// Build the HTTP handler state from a validated config.
pub fn build_state(config: &ServiceConfig) -> anyhow::Result<AppState> {
    let service = build_service(config)?;
    Ok(AppState::new(service, config.history))
}
