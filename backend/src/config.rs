//! Configuration management for the Will It Rain backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WIR_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// OpenWeatherMap API configuration
    pub weather: WeatherConfig,

    /// Gemini generative AI configuration
    pub gemini: GeminiConfig,

    /// Out-of-process ML predictor configuration
    pub ml: MlConfig,

    /// Geocoding provider configuration
    pub geocoding: GeocodingConfig,

    /// Cache TTLs
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// Generative language API endpoint
    pub api_endpoint: String,

    /// Model identifier
    pub model: String,

    /// API key
    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MlConfig {
    /// Interpreter used to run the predictor script
    pub interpreter: String,

    /// Path to the predictor script
    pub script_path: String,

    /// Hard upper bound on a prediction run, in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    /// Google Maps geocoding API key
    pub google_api_key: String,

    /// Indian postal pincode lookup endpoint
    pub postal_endpoint: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// ML prediction cache TTL in seconds
    pub ml_ttl_secs: u64,

    /// Geocoding cache TTL in seconds
    pub geocode_ttl_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WIR_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3002)?
            .set_default("server.host", "0.0.0.0")?
            .set_default(
                "weather.api_endpoint",
                "https://api.openweathermap.org",
            )?
            .set_default("weather.api_key", "")?
            .set_default(
                "gemini.api_endpoint",
                "https://generativelanguage.googleapis.com",
            )?
            .set_default("gemini.model", "gemini-pro")?
            .set_default("gemini.api_key", "")?
            .set_default("ml.interpreter", "python3")?
            .set_default("ml.script_path", "scripts/predict.py")?
            .set_default("ml.timeout_secs", 10)?
            .set_default("geocoding.google_api_key", "")?
            .set_default(
                "geocoding.postal_endpoint",
                "https://api.postalpincode.in",
            )?
            .set_default("cache.ml_ttl_secs", 3600)?
            .set_default("cache.geocode_ttl_secs", 86400)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WIR_ prefix)
            .add_source(
                Environment::with_prefix("WIR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3002,
            host: "0.0.0.0".to_string(),
        }
    }
}
