pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod render;
pub mod store;
pub mod upload;

use std::sync::Arc;
use cache::DescriptionCache;
use config::Config;
use error::Result;
use llm::{CompletionClient, OpenRouterClient};
use store::UploadStore;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<DescriptionCache>,
    pub store: Arc<UploadStore>,
    pub ai: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(config: Config, ai: Arc<dyn CompletionClient>) -> Self {
        let store = UploadStore::new(config.upload_dir.clone());
        Self {
            config: Arc::new(config),
            cache: Arc::new(DescriptionCache::new()),
            store: Arc::new(store),
            ai,
        }
    }

    /// State wired to the configured OpenRouter-compatible provider.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = OpenRouterClient::new(
            &config.ai_base_url,
            &config.api_key,
            &config.ai_model,
            config.ai_timeout,
        )?;
        Ok(Self::new(config, Arc::new(client)))
    }
}
