use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::estimator::parse_area;
use crate::pipeline::{EstimateView, render_estimate, run_estimate};

/// Area as the form sends it: a JSON number, or the raw text of the field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AreaInput {
    Number(f64),
    Text(String),
}

impl AreaInput {
    pub fn to_sqm(&self) -> AppResult<f64> {
        match self {
            AreaInput::Number(value) => Ok(*value),
            AreaInput::Text(text) => parse_area(text),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EstimateBody {
    pub area_sqm: AreaInput,
}

pub async fn create_estimate(Json(body): Json<EstimateBody>) -> AppResult<Json<EstimateView>> {
    let area_sqm = body.area_sqm.to_sqm()?;
    let estimate = run_estimate(area_sqm)?;

    Ok(Json(render_estimate(area_sqm, estimate)))
}
