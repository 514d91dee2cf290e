//! HTTP handler for sector recommendations

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{parse_target_date, Prediction, Sector};

use crate::error::{AppError, AppResult};
use crate::services::recommendation::{RecommendationContext, RecommendationResponse};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub sector: String,
    pub location: String,
    /// Optional target date, echoed from the prediction when omitted
    pub date: Option<String>,
    pub weather_data: Prediction,
    #[serde(flatten)]
    pub context: RecommendationContext,
}

fn resolve_sector(name: &str) -> AppResult<Sector> {
    let lowered = name.trim().to_lowercase();
    Sector::ALL
        .iter()
        .find(|s| s.name() == lowered)
        .copied()
        .ok_or_else(|| AppError::UnsupportedSector(name.to_string()))
}

/// Generate sector-specific recommendations for a prediction
pub async fn get_recommendations(
    State(state): State<AppState>,
    Json(body): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let sector = resolve_sector(&body.sector)?;

    if let Some(date) = &body.date {
        parse_target_date(date).map_err(|e| AppError::Validation(e.to_string()))?;
    }

    let response = state
        .recommendations
        .recommend(sector, &body.weather_data, &body.location, &body.context)
        .await;

    Ok(Json(response))
}
