//! Will It Rain - Backend Server
//!
//! A weather prediction service that layers an out-of-process ML predictor,
//! live forecasts, generative AI, and a deterministic climate model into a
//! single always-answering cascade, plus sector-specific recommendations
//! and location geocoding.

use axum::{routing::get, Router};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod cache;
pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use external::gemini::GeminiClient;
use external::ml_process::MlProcessClient;
use external::weather::WeatherClient;
use services::geocoding::GeocodingService;
use services::recommendation::RecommendationEngine;
use services::resolver::PredictionResolver;
use services::statistical::RainModel;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: Arc<PredictionResolver>,
    pub recommendations: RecommendationEngine,
    pub geocoding: Arc<GeocodingService>,
    pub model: Arc<RwLock<RainModel>>,
    pub ml_client: Arc<MlProcessClient>,
}

impl AppState {
    /// Wire up all clients and services from configuration
    pub fn from_config(config: Config) -> Self {
        let weather = WeatherClient::with_base_url(
            config.weather.api_key.clone(),
            config.weather.api_endpoint.clone(),
        );
        let gemini = GeminiClient::new(
            config.gemini.api_endpoint.clone(),
            config.gemini.model.clone(),
            config.gemini.api_key.clone(),
        );
        let ml_client = Arc::new(MlProcessClient::new(
            config.ml.interpreter.clone(),
            config.ml.script_path.clone(),
            Duration::from_secs(config.ml.timeout_secs),
            Duration::from_secs(config.cache.ml_ttl_secs),
        ));
        let model = Arc::new(RwLock::new(RainModel::default()));
        let geocoding = Arc::new(GeocodingService::new(
            config.geocoding.google_api_key.clone(),
            config.weather.api_key.clone(),
            config.geocoding.postal_endpoint.clone(),
            Duration::from_secs(config.cache.geocode_ttl_secs),
        ));
        let resolver = Arc::new(PredictionResolver::with_default_sources(
            weather,
            ml_client.clone(),
            gemini.clone(),
            model.clone(),
        ));
        let recommendations = RecommendationEngine::new(gemini);

        Self {
            config: Arc::new(config),
            resolver,
            recommendations,
            geocoding,
            model,
            ml_client,
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Will It Rain API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
