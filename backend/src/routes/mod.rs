//! Route definitions for the Will It Rain API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Prediction cascade
        .route("/weather", get(handlers::get_weather_prediction))
        // Location resolution
        .route("/geocode", get(handlers::geocode_location))
        // Sector recommendations
        .route("/recommendations", post(handlers::get_recommendations))
        // Direct ML predictor access
        .nest("/ml", ml_routes())
}

/// ML predictor routes
fn ml_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", get(handlers::get_ml_prediction))
        .route("/train", post(handlers::train_model))
}
