use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use upsell_agent::{
    HeuristicIntentClassifier, IntentClassifier, LlmIntentClassifier, OpenAiCompatibleClient,
    PromptBuilder, SalesAgentRuntime,
};
use upsell_catalog::{CatalogCache, CatalogError, CatalogSource, CatalogStore, RentalApiClient};
use upsell_core::config::{AppConfig, ConfigError, LlmProvider};
use upsell_core::offer::DeterministicOfferRuntime;

use crate::routes::AppState;

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<CatalogStore>,
    pub catalog_source: Arc<dyn CatalogSource>,
    pub cache: CatalogCache,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),
    #[error("sales agent setup failed: {0}")]
    Agent(anyhow::Error),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        catalog_source = ?config.catalog.source,
        llm_provider = ?config.llm.provider,
        "starting application bootstrap"
    );

    let cache = CatalogCache::new(config.catalog.cache_dir.clone());
    let catalog_source: Arc<dyn CatalogSource> = Arc::new(RentalApiClient::new(&config.rental_api)?);
    let catalog = Arc::new(
        CatalogStore::initialize(config.catalog.source, catalog_source.as_ref(), &cache).await?,
    );

    let agent = SalesAgentRuntime::new(intent_classifier(&config)?);
    let prompts = PromptBuilder::new().map_err(BootstrapError::Agent)?;
    let state = AppState::new(
        catalog.clone(),
        Arc::new(DeterministicOfferRuntime::with_policy(config.selection)),
        Arc::new(agent),
        Arc::new(prompts),
    );

    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        "application bootstrap complete"
    );

    Ok(Application { config, catalog, catalog_source, cache, state })
}

fn intent_classifier(config: &AppConfig) -> Result<Arc<dyn IntentClassifier>, BootstrapError> {
    match config.llm.provider {
        LlmProvider::Heuristic => Ok(Arc::new(HeuristicIntentClassifier)),
        LlmProvider::OpenAi | LlmProvider::Ollama => {
            let client =
                OpenAiCompatibleClient::from_config(&config.llm).map_err(BootstrapError::Agent)?;
            Ok(Arc::new(LlmIntentClassifier::new(Arc::new(client))))
        }
    }
}
