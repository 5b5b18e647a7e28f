use thiserror::Error;

/// Why a completion call produced no usable text.
///
/// Every variant keeps whatever body the endpoint sent back so the caller
/// can show it next to the error description.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("invalid API key header: {0}")]
    InvalidKey(String),

    #[error("request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
        body: String,
    },

    #[error("completion endpoint returned {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: String,
    },

    #[error("completion endpoint reported an error: {message}")]
    Api { message: String, body: String },

    #[error("invalid JSON in completion response: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("completion response has no choices[0].message.content")]
    MissingContent { body: String },
}

impl CompletionError {
    pub fn raw_body(&self) -> &str {
        match self {
            CompletionError::InvalidKey(_) => "",
            CompletionError::Transport { body, .. }
            | CompletionError::Status { body, .. }
            | CompletionError::Api { body, .. }
            | CompletionError::Malformed { body, .. }
            | CompletionError::MissingContent { body } => body,
        }
    }

    /// Low-cardinality `error.type` value for spans and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::InvalidKey(_) => "auth_error",
            CompletionError::Transport { source, .. } => {
                if source.is_timeout() {
                    "timeout"
                } else if source.is_connect() {
                    "network_error"
                } else {
                    "transport_error"
                }
            }
            CompletionError::Status { status, .. } => match status {
                429 => "rate_limit",
                401 | 403 => "auth_error",
                400..=499 => "invalid_request",
                500..=599 => "server_error",
                _ => "unknown_error",
            },
            CompletionError::Api { .. } => "provider_error",
            CompletionError::Malformed { .. } | CompletionError::MissingContent { .. } => {
                "invalid_response"
            }
        }
    }
}
