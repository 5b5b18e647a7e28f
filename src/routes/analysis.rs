use axum::{Json, extract::State};
use serde::Deserialize;

use crate::AppState;
use crate::error::AppResult;
use crate::llm::ApiKey;
use crate::pipeline::{AnalysisView, RooftopSubmission, analyze_rooftop, render_analysis};

use super::estimate::AreaInput;

#[derive(Deserialize)]
pub struct AnalysisBody {
    pub api_key: String,
    pub area_sqm: AreaInput,
    #[serde(default)]
    pub orientation: String,
    #[serde(default)]
    pub obstructions: String,
    #[serde(default)]
    pub shading: String,
}

impl AnalysisBody {
    pub fn into_submission(self) -> AppResult<RooftopSubmission> {
        Ok(RooftopSubmission {
            area_sqm: self.area_sqm.to_sqm()?,
            api_key: ApiKey::new(self.api_key),
            orientation: self.orientation,
            obstructions: self.obstructions,
            shading: self.shading,
        })
    }
}

pub async fn create_analysis(
    State(state): State<AppState>,
    Json(body): Json<AnalysisBody>,
) -> AppResult<Json<AnalysisView>> {
    let submission = body.into_submission()?;
    let analysis = analyze_rooftop(&state.llm_client, &state.config, &submission).await?;

    Ok(Json(render_analysis(analysis)))
}
