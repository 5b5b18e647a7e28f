use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult, current_trace_id};
use crate::estimator::{self, INVALID_AREA_MESSAGE, InstallationEstimate};
use crate::llm::{ApiKey, CompletionRequest, LlmClient, ReportOutcome};
use crate::telemetry::metrics::{
    SOLAR_ANALYSIS_DURATION, SOLAR_ESTIMATE_PANELS, SOLAR_ESTIMATES_TOTAL,
};

use super::prompt::{SYSTEM_INSTRUCTION, build_prompt};

pub const NON_POSITIVE_AREA_MESSAGE: &str = "Please enter a valid rooftop area greater than 0.";
pub const MISSING_API_KEY_MESSAGE: &str = "Please enter your OpenRouter API key.";

/// One form submission, captured once and shared read-only by both the
/// report request and the estimate.
#[derive(Debug, Clone)]
pub struct RooftopSubmission {
    pub api_key: ApiKey,
    pub area_sqm: f64,
    pub orientation: String,
    pub obstructions: String,
    pub shading: String,
}

impl RooftopSubmission {
    pub fn validate(&self) -> AppResult<()> {
        if self.api_key.is_blank() {
            return Err(AppError::Validation(MISSING_API_KEY_MESSAGE.to_string()));
        }
        if !self.area_sqm.is_finite() {
            return Err(AppError::Validation(INVALID_AREA_MESSAGE.to_string()));
        }
        if self.area_sqm <= 0.0 {
            return Err(AppError::Validation(NON_POSITIVE_AREA_MESSAGE.to_string()));
        }
        estimator::DEFAULT_ASSUMPTIONS.check_area(self.area_sqm)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RooftopAnalysis {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub area_sqm: f64,
    pub report: ReportOutcome,
    pub estimate: InstallationEstimate,
    pub duration_ms: u64,
    pub trace_id: Option<String>,
}

/// Runs the estimator and records the domain metrics for it.
pub fn run_estimate(area_sqm: f64) -> AppResult<InstallationEstimate> {
    let estimate = estimator::estimate_area(area_sqm)?;

    SOLAR_ESTIMATES_TOTAL.add(
        1,
        &[KeyValue::new(
            "solar.estimate.has_payback",
            estimate.payback_years.is_some(),
        )],
    );
    SOLAR_ESTIMATE_PANELS.record(estimate.panel_count as f64, &[]);

    Ok(estimate)
}

#[tracing::instrument(
    name = "pipeline rooftop_analysis",
    skip(llm_client, config, submission),
    fields(
        analysis.id,
        analysis.area_sqm = submission.area_sqm,
        analysis.panel_count,
        analysis.report_status,
        analysis.duration_ms,
    )
)]
pub async fn analyze_rooftop(
    llm_client: &LlmClient,
    config: &Config,
    submission: &RooftopSubmission,
) -> AppResult<RooftopAnalysis> {
    submission.validate()?;

    let start = std::time::Instant::now();
    let id = Uuid::new_v4();

    let request = CompletionRequest {
        model: config.llm_model.clone(),
        system: SYSTEM_INSTRUCTION.to_string(),
        prompt: build_prompt(submission),
        max_tokens: config.llm_max_tokens,
        api_key: submission.api_key.clone(),
    };

    // The estimate does not depend on the report, so a failed report is
    // carried along rather than returned.
    let report = llm_client.request_report(&request).await;
    let estimate = run_estimate(submission.area_sqm)?;

    let duration = start.elapsed();
    SOLAR_ANALYSIS_DURATION.record(
        duration.as_secs_f64(),
        &[KeyValue::new("solar.report.generated", report.is_generated())],
    );

    let span = tracing::Span::current();
    span.record("analysis.id", id.to_string());
    span.record("analysis.panel_count", estimate.panel_count);
    span.record(
        "analysis.report_status",
        if report.is_generated() { "generated" } else { "failed" },
    );
    span.record("analysis.duration_ms", duration.as_millis() as u64);

    tracing::info!(
        analysis.id = %id,
        panels = estimate.panel_count,
        report_generated = report.is_generated(),
        "rooftop analysis complete"
    );

    Ok(RooftopAnalysis {
        id,
        generated_at: Utc::now(),
        area_sqm: submission.area_sqm,
        report,
        estimate,
        duration_ms: duration.as_millis() as u64,
        trace_id: current_trace_id(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(api_key: &str, area_sqm: f64) -> RooftopSubmission {
        RooftopSubmission {
            api_key: ApiKey::new(api_key),
            area_sqm,
            orientation: "South-facing".to_string(),
            obstructions: "none".to_string(),
            shading: "0%".to_string(),
        }
    }

    fn validation_message(result: AppResult<()>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_accepts_positive_area() {
        assert!(submission("sk-test", 16.0).validate().is_ok());
        assert!(submission("sk-test", 0.1).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_area() {
        for area in [0.0, -1.0, -0.0] {
            assert_eq!(
                validation_message(submission("sk-test", area).validate()),
                NON_POSITIVE_AREA_MESSAGE
            );
        }
    }

    #[test]
    fn test_validate_rejects_non_finite_area() {
        assert_eq!(
            validation_message(submission("sk-test", f64::NAN).validate()),
            INVALID_AREA_MESSAGE
        );
        assert_eq!(
            validation_message(submission("sk-test", f64::INFINITY).validate()),
            INVALID_AREA_MESSAGE
        );
    }

    #[test]
    fn test_validate_rejects_area_too_large_to_count() {
        assert_eq!(
            validation_message(submission("sk-test", 1e20).validate()),
            INVALID_AREA_MESSAGE
        );
    }

    #[test]
    fn test_validate_requires_api_key() {
        assert_eq!(
            validation_message(submission("  ", 16.0).validate()),
            MISSING_API_KEY_MESSAGE
        );
    }

    #[test]
    fn test_run_estimate_matches_estimator() {
        let estimate = run_estimate(16.0).unwrap();
        assert_eq!(estimate, estimator::estimate_area(16.0).unwrap());
        assert!(run_estimate(-5.0).is_err());
    }
}
