pub mod config;
pub mod error;
pub mod estimator;
pub mod llm;
pub mod pipeline;
pub mod routes;
pub mod telemetry;

use std::sync::Arc;

pub use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm_client: Arc<llm::LlmClient>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let provider = llm::openrouter::OpenRouterProvider::new(&config.openrouter_base_url)?;
        Ok(Self {
            llm_client: Arc::new(llm::LlmClient::new(Arc::new(provider))),
            config,
        })
    }
}
