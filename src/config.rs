use std::env;

pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_LLM_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_LLM_MAX_TOKENS: u32 = 500;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub openrouter_base_url: String,
    pub llm_model: String,
    pub llm_max_tokens: u32,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

impl Config {
    /// Reads settings from the environment (and `.env` if present).
    ///
    /// The OpenRouter API key is deliberately absent: it arrives with each
    /// submission and is never read from the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("APP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("APP_PORT must be a number"),
            environment: env::var("SCOUT_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            openrouter_base_url: env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            llm_max_tokens: env::var("LLM_MAX_TOKENS")
                .unwrap_or_else(|_| DEFAULT_LLM_MAX_TOKENS.to_string())
                .parse()
                .expect("LLM_MAX_TOKENS must be a number"),
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "solar-rooftop-analyzer".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
        }
    }

    /// Development defaults pointed at an arbitrary completion endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            port: 8080,
            environment: "development".to_string(),
            openrouter_base_url: base_url.into(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_max_tokens: DEFAULT_LLM_MAX_TOKENS,
            otel_service_name: "solar-rooftop-analyzer".to_string(),
            otel_exporter_endpoint: "http://localhost:4317".to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
