pub mod format;
pub mod orchestrator;
pub mod prompt;

pub use format::{AnalysisView, EstimateView, InstallationSummary, render_analysis, render_estimate};
pub use orchestrator::{RooftopAnalysis, RooftopSubmission, analyze_rooftop, run_estimate};
