//! HTTP handler for the weather prediction endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{parse_target_date, validate_coordinates, Coordinates, Prediction};

use crate::error::{AppError, AppResult};
use crate::services::resolver::PredictionRequest;
use crate::AppState;

/// Query parameters for a prediction.
///
/// Coordinates arrive as strings so a bad value yields a 400 with a message
/// instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: String,
    pub lon: String,
    pub date: String,
}

impl WeatherQuery {
    /// Parse and validate into a prediction request
    pub fn into_request(self) -> AppResult<PredictionRequest> {
        let latitude: f64 = self
            .lat
            .trim()
            .parse()
            .map_err(|_| AppError::Validation(format!("invalid latitude '{}'", self.lat)))?;
        let longitude: f64 = self
            .lon
            .trim()
            .parse()
            .map_err(|_| AppError::Validation(format!("invalid longitude '{}'", self.lon)))?;

        validate_coordinates(&Coordinates::new(latitude, longitude))
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let date = parse_target_date(&self.date).map_err(|e| AppError::Validation(e.to_string()))?;

        Ok(PredictionRequest {
            latitude,
            longitude,
            date,
        })
    }
}

/// Resolve a rain prediction for a location and date
pub async fn get_weather_prediction(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Json<Prediction>> {
    let request = query.into_request()?;
    let prediction = state.resolver.resolve(request).await?;
    Ok(Json(prediction))
}
