use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::estimator::{InstallationEstimate, round_to};
use crate::llm::ReportOutcome;

use super::orchestrator::RooftopAnalysis;

/// Estimate rounded for display: capacity to two decimals, money and energy
/// to whole units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallationSummary {
    pub panels: u64,
    pub capacity_kw: f64,
    pub estimated_cost_inr: i64,
    pub annual_generation_kwh: i64,
    pub annual_savings_inr: i64,
    pub payback_period_years: Option<f64>,
}

impl From<&InstallationEstimate> for InstallationSummary {
    fn from(est: &InstallationEstimate) -> Self {
        Self {
            panels: est.panel_count,
            capacity_kw: round_to(est.capacity_kw, 2),
            estimated_cost_inr: est.estimated_cost.round() as i64,
            annual_generation_kwh: est.annual_generation_kwh.round() as i64,
            annual_savings_inr: est.annual_savings.round() as i64,
            payback_period_years: est.payback_years,
        }
    }
}

impl InstallationSummary {
    pub fn lines(&self) -> Vec<String> {
        let payback = match self.payback_period_years {
            Some(years) => format!("{years:.1} years"),
            None => "n/a (no savings)".to_string(),
        };

        vec![
            format!("Estimated Panels: {}", self.panels),
            format!("Total Capacity: {:?} kW", self.capacity_kw),
            format!("Estimated Cost: ₹{}", self.estimated_cost_inr),
            format!("Annual Generation: {} kWh", self.annual_generation_kwh),
            format!("Annual Savings: ₹{}", self.annual_savings_inr),
            format!("Payback Period: {payback}"),
        ]
    }
}

/// What the form renders: the report as text, then the installation summary.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub report_text: String,
    pub report: ReportOutcome,
    pub estimate: InstallationEstimate,
    pub summary: InstallationSummary,
    pub summary_lines: Vec<String>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EstimateView {
    pub area_sqm: f64,
    pub estimate: InstallationEstimate,
    pub summary: InstallationSummary,
    pub summary_lines: Vec<String>,
}

#[tracing::instrument(
    name = "pipeline_stage format",
    skip(analysis),
    fields(analysis.id = %analysis.id)
)]
pub fn render_analysis(analysis: RooftopAnalysis) -> AnalysisView {
    let summary = InstallationSummary::from(&analysis.estimate);
    let summary_lines = summary.lines();

    AnalysisView {
        id: analysis.id,
        generated_at: analysis.generated_at,
        report_text: analysis.report.display_text(),
        report: analysis.report,
        estimate: analysis.estimate,
        summary,
        summary_lines,
        duration_ms: analysis.duration_ms,
        trace_id: analysis.trace_id,
    }
}

pub fn render_estimate(area_sqm: f64, estimate: InstallationEstimate) -> EstimateView {
    let summary = InstallationSummary::from(&estimate);
    EstimateView {
        area_sqm,
        summary_lines: summary.lines(),
        summary,
        estimate,
    }
}
