use reqwest::Url;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{CompletionError, CompletionRequest, CompletionResponse, Provider};

/// OpenAI-compatible chat-completion endpoint, OpenRouter by default.
pub struct OpenRouterProvider {
    client: reqwest::Client,
    endpoint: String,
    host: String,
    port: u16,
}

impl OpenRouterProvider {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base = base_url.trim_end_matches('/');
        let url = Url::parse(base)
            .map_err(|e| anyhow::anyhow!("invalid completion base URL {base:?}: {e}"))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: format!("{base}/chat/completions"),
            host: url.host_str().unwrap_or("unknown").to_string(),
            port: url.port_or_known_default().unwrap_or(443),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    model: Option<String>,
    usage: Option<ChatUsage>,
    error: Option<ChatErrorDetail>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct ChatError {
    error: ChatErrorDetail,
}

#[derive(Deserialize)]
struct ChatErrorDetail {
    message: String,
}

fn parse_completion(body: String) -> Result<CompletionResponse, CompletionError> {
    let resp: ChatResponse = match serde_json::from_str(&body) {
        Ok(resp) => resp,
        Err(source) => return Err(CompletionError::Malformed { source, body }),
    };

    let first = resp.choices.into_iter().next();
    let finish_reason = first
        .as_ref()
        .and_then(|c| c.finish_reason.clone())
        .unwrap_or_default();

    let Some(content) = first.and_then(|c| c.message).and_then(|m| m.content) else {
        if let Some(err) = resp.error {
            return Err(CompletionError::Api {
                message: err.message,
                body,
            });
        }
        return Err(CompletionError::MissingContent { body });
    };

    let (input_tokens, output_tokens) = match &resp.usage {
        Some(usage) => (usage.prompt_tokens, usage.completion_tokens),
        None => (0, 0),
    };

    Ok(CompletionResponse {
        content,
        model: resp.model.unwrap_or_default(),
        input_tokens,
        output_tokens,
        finish_reason,
    })
}

#[async_trait::async_trait]
impl Provider for OpenRouterProvider {
    async fn complete(
        &self,
        req: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", req.api_key.expose()))
            .map_err(|e| CompletionError::InvalidKey(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = ChatRequest {
            model: &req.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &req.system,
                },
                ChatMessage {
                    role: "user",
                    content: &req.prompt,
                },
            ],
            max_tokens: req.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|source| CompletionError::Transport {
                source,
                body: String::new(),
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| CompletionError::Transport {
                source,
                body: String::new(),
            })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ChatError>(&text)
                .map(|err| err.error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message,
                body: text,
            });
        }

        parse_completion(text)
    }

    fn name(&self) -> &str {
        "openrouter"
    }

    fn server(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}
