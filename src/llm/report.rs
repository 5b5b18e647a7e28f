use serde::Serialize;

use super::{CompletionError, CompletionResponse};

pub const FAILURE_PREFIX: &str = "Error from OpenRouter";

/// Result of asking the model for a feasibility report.
///
/// A failure is an ordinary value here; it only turns into display text via
/// [`ReportOutcome::display_text`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Generated(CompletionResponse),
    Failed { message: String, raw_body: String },
}

impl ReportOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, ReportOutcome::Generated(_))
    }

    /// The report text verbatim, or the error description followed by the raw
    /// response body.
    pub fn display_text(&self) -> String {
        match self {
            ReportOutcome::Generated(resp) => resp.content.clone(),
            ReportOutcome::Failed { message, raw_body } => {
                format!("{FAILURE_PREFIX}: {message} | Raw: {raw_body}")
            }
        }
    }
}

impl From<Result<CompletionResponse, CompletionError>> for ReportOutcome {
    fn from(result: Result<CompletionResponse, CompletionError>) -> Self {
        match result {
            Ok(resp) => ReportOutcome::Generated(resp),
            Err(err) => ReportOutcome::Failed {
                message: err.to_string(),
                raw_body: err.raw_body().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(content: &str) -> ReportOutcome {
        ReportOutcome::Generated(CompletionResponse {
            content: content.to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            input_tokens: 10,
            output_tokens: 20,
            finish_reason: "stop".to_string(),
        })
    }

    #[test]
    fn test_generated_text_is_verbatim() {
        let outcome = generated("  ## Summary\nSouth-facing roof is ideal.\n");
        assert!(outcome.is_generated());
        assert_eq!(
            outcome.display_text(),
            "  ## Summary\nSouth-facing roof is ideal.\n"
        );
    }

    #[test]
    fn test_failure_from_error_keeps_raw_body() {
        let outcome: ReportOutcome = Err(CompletionError::MissingContent {
            body: r#"{"id":"gen-1"}"#.to_string(),
        })
        .into();

        assert!(!outcome.is_generated());
        let text = outcome.display_text();
        assert!(text.starts_with("Error from OpenRouter: "));
        assert!(text.ends_with(r#" | Raw: {"id":"gen-1"}"#));
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(generated("hi")).unwrap();
        assert_eq!(value["status"], "generated");
        assert_eq!(value["content"], "hi");

        let failed = ReportOutcome::Failed {
            message: "boom".to_string(),
            raw_body: "raw".to_string(),
        };
        let value = serde_json::to_value(failed).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["raw_body"], "raw");
    }
}
