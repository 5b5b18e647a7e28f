use std::sync::Arc;
use std::time::Instant;

use opentelemetry::KeyValue;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::{CompletionError, CompletionRequest, CompletionResponse, Provider, ReportOutcome};
use crate::telemetry::metrics::{
    GEN_AI_ERROR_COUNT, GEN_AI_OPERATION_DURATION, GEN_AI_TOKEN_USAGE,
};

/// Single-shot completion client. One call per submission, no retries.
pub struct LlmClient {
    pub provider: Arc<dyn Provider>,
}

impl LlmClient {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub async fn complete(
        &self,
        req: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let provider_name = self.provider.name();
        let (server_addr, server_port) = self.provider.server();
        let span_display_name = format!("gen_ai.chat {}", req.model);
        let start = Instant::now();

        let span = tracing::info_span!(
            "gen_ai.chat",
            otel.name = %span_display_name,
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %provider_name,
            gen_ai.request.model = %req.model,
            server.address = %server_addr,
            server.port = server_port as i64,
            gen_ai.request.max_tokens = req.max_tokens as i64,
            gen_ai.response.model = tracing::field::Empty,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
            otel.status_code = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );

        {
            let mut user_event_attrs =
                vec![KeyValue::new("gen_ai.prompt", truncate(&req.prompt, 1000))];
            if !req.system.is_empty() {
                user_event_attrs.push(KeyValue::new(
                    "gen_ai.system_instructions",
                    truncate(&req.system, 500),
                ));
            }
            span.add_event("gen_ai.user.message", user_event_attrs);
        }

        let result = self.provider.complete(req).instrument(span.clone()).await;

        let duration = start.elapsed().as_secs_f64();
        let op_kv = KeyValue::new("gen_ai.operation.name", "chat");
        let provider_kv = KeyValue::new("gen_ai.provider.name", provider_name.to_string());
        let model_kv = KeyValue::new("gen_ai.request.model", req.model.clone());

        GEN_AI_OPERATION_DURATION.record(
            duration,
            &[op_kv.clone(), provider_kv.clone(), model_kv.clone()],
        );

        match result {
            Ok(resp) => {
                span.record("gen_ai.response.model", resp.model.as_str());
                span.record("gen_ai.usage.input_tokens", resp.input_tokens as i64);
                span.record("gen_ai.usage.output_tokens", resp.output_tokens as i64);
                if !resp.finish_reason.is_empty() {
                    span.record(
                        "gen_ai.response.finish_reasons",
                        resp.finish_reason.as_str(),
                    );
                }

                span.add_event(
                    "gen_ai.assistant.message",
                    vec![KeyValue::new(
                        "gen_ai.completion",
                        truncate(&resp.content, 2000),
                    )],
                );

                GEN_AI_TOKEN_USAGE.record(
                    f64::from(resp.input_tokens),
                    &[
                        KeyValue::new("gen_ai.token.type", "input"),
                        op_kv.clone(),
                        provider_kv.clone(),
                        model_kv.clone(),
                    ],
                );
                GEN_AI_TOKEN_USAGE.record(
                    f64::from(resp.output_tokens),
                    &[
                        KeyValue::new("gen_ai.token.type", "output"),
                        op_kv,
                        provider_kv,
                        model_kv,
                    ],
                );

                Ok(resp)
            }
            Err(err) => {
                let kind = err.kind();
                span.record("otel.status_code", "ERROR");
                span.record("error.type", kind);

                GEN_AI_ERROR_COUNT.add(
                    1,
                    &[provider_kv, model_kv, KeyValue::new("error.type", kind)],
                );

                tracing::warn!(
                    provider = provider_name,
                    model = %req.model,
                    error.type = kind,
                    error = %err,
                    "completion request failed"
                );

                Err(err)
            }
        }
    }

    /// Asks for the feasibility report. Never fails: errors become
    /// [`ReportOutcome::Failed`].
    pub async fn request_report(&self, req: &CompletionRequest) -> ReportOutcome {
        self.complete(req).await.into()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        s.char_indices()
            .take_while(|&(i, c)| i + c.len_utf8() <= max)
            .map(|(_, c)| c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ApiKey;

    struct CannedProvider {
        result: fn() -> Result<CompletionResponse, CompletionError>,
    }

    #[async_trait::async_trait]
    impl Provider for CannedProvider {
        async fn complete(
            &self,
            _req: &CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            (self.result)()
        }

        fn name(&self) -> &str {
            "canned"
        }

        fn server(&self) -> (&str, u16) {
            ("localhost", 0)
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "openai/gpt-4o-mini".to_string(),
            system: "You are an expert.".to_string(),
            prompt: "Analyze this roof".to_string(),
            max_tokens: 500,
            api_key: ApiKey::new("sk-test"),
        }
    }

    #[test]
    fn test_request_report_success() {
        let client = LlmClient::new(Arc::new(CannedProvider {
            result: || {
                Ok(CompletionResponse {
                    content: "Roof is suitable.".to_string(),
                    model: "openai/gpt-4o-mini".to_string(),
                    input_tokens: 50,
                    output_tokens: 5,
                    finish_reason: "stop".to_string(),
                })
            },
        }));

        let outcome = tokio_test::block_on(client.request_report(&request()));
        assert!(outcome.is_generated());
        assert_eq!(outcome.display_text(), "Roof is suitable.");
    }

    #[test]
    fn test_request_report_failure_is_a_value() {
        let client = LlmClient::new(Arc::new(CannedProvider {
            result: || {
                Err(CompletionError::Status {
                    status: 502,
                    message: "Bad Gateway".to_string(),
                    body: "upstream exploded".to_string(),
                })
            },
        }));

        let outcome = tokio_test::block_on(client.request_report(&request()));
        match outcome {
            ReportOutcome::Failed { message, raw_body } => {
                assert!(message.contains("502"));
                assert_eq!(raw_body, "upstream exploded");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let result = truncate("hé世界!", 3);
        assert!(result.len() <= 3);
        assert!(result.is_char_boundary(result.len()));
    }

    #[test]
    fn test_truncate_stops_before_straddling_char() {
        assert_eq!(truncate("a世界", 2), "a");
        assert_eq!(truncate("a世界", 4), "a世");
        assert_eq!(truncate("世界", 1), "");
    }
}
