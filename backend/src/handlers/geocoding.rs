//! HTTP handler for location geocoding

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use shared::GeocodedLocation;

use crate::error::AppResult;
use crate::services::geocoding::GeocodeQuery;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub success: bool,
    pub location: GeocodedLocation,
}

/// Resolve an address, postal code, or place name to coordinates
pub async fn geocode_location(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> AppResult<Json<GeocodeResponse>> {
    let location = state.geocoding.geocode(&query).await?;
    Ok(Json(GeocodeResponse {
        success: true,
        location,
    }))
}
