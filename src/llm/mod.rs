pub mod client;
pub mod error;
pub mod openrouter;
pub mod report;

use std::fmt;

use serde::Serialize;

pub use client::LlmClient;
pub use error::CompletionError;
pub use report::ReportOutcome;

/// User-supplied bearer credential. Never printed, logged or serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub api_key: ApiKey,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: String,
}

#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn complete(
        &self,
        req: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError>;
    fn name(&self) -> &str;
    /// Host and port the provider talks to, for span attributes.
    fn server(&self) -> (&str, u16);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("sk-or-v1-secret");
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("secret"));
        assert_eq!(rendered, "ApiKey(<redacted>)");

        let req = CompletionRequest {
            model: "m".to_string(),
            system: String::new(),
            prompt: "p".to_string(),
            max_tokens: 1,
            api_key: key,
        };
        assert!(!format!("{req:?}").contains("sk-or-v1-secret"));
    }

    #[test]
    fn test_api_key_blank() {
        assert!(ApiKey::new("   ").is_blank());
        assert!(!ApiKey::new("k").is_blank());
        assert_eq!(ApiKey::new("k").expose(), "k");
    }
}
