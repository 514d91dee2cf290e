//! HTTP handlers for the out-of-process ML predictor

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use shared::Prediction;

use crate::error::{AppError, AppResult};
use crate::handlers::weather::WeatherQuery;
use crate::services::resolver::{MlSource, PredictionSource, SourceContext};
use crate::services::trainer::{self, TrainingReport};
use crate::AppState;

/// Run the ML predictor directly, bypassing the source cascade
pub async fn get_ml_prediction(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Json<Prediction>> {
    let request = query.into_request()?;

    let ctx = SourceContext {
        request,
        today: Utc::now().date_naive(),
        current_weather: None,
    };

    let source = MlSource::new(state.ml_client.clone());
    let prediction = source
        .resolve(&ctx)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    Ok(Json(prediction))
}

/// Retrain the statistical rain model on synthetic seed-city data.
///
/// Training runs on the blocking pool against a copy of the model; the live
/// model is swapped only after the run completes, so concurrent predictions
/// keep serving the previous weights.
pub async fn train_model(State(state): State<AppState>) -> AppResult<Json<TrainingReport>> {
    let model = state.model.clone();

    let report = tokio::task::spawn_blocking(move || {
        let mut working = model
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let mut rng = rand::thread_rng();
        let report = trainer::train(&mut working, &mut rng);
        *model.write().unwrap_or_else(|e| e.into_inner()) = working;
        report
    })
    .await
    .map_err(|e| AppError::Internal(format!("training task failed: {}", e)))?;

    Ok(Json(report))
}
