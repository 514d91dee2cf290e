//! Out-of-process ML predictor
//!
//! Spawns the trained predictor script with a JSON feature vector on argv and
//! expects one JSON object on stdout within a hard timeout. Results are cached
//! per (lat, lon, date) for an hour to avoid repeated subprocess launches.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::error::SourceError;

/// Feature vector fed to the predictor script.
///
/// The meteorological field names follow the NASA POWER dataset the model was
/// trained on (T2M temperature, RH2M humidity, WS10M wind, PS pressure,
/// PRECTOTCORR precipitation).
#[derive(Debug, Clone, Serialize)]
pub struct FeatureVector {
    pub lat: f64,
    pub lon: f64,
    pub month: u32,
    pub day_of_year: u32,
    pub season: u32,
    pub climate_zone: String,
    #[serde(rename = "T2M")]
    pub temperature: f64,
    #[serde(rename = "RH2M")]
    pub humidity: f64,
    #[serde(rename = "WS10M")]
    pub wind_speed: f64,
    #[serde(rename = "PS")]
    pub pressure: f64,
    #[serde(rename = "PRECTOTCORR")]
    pub precipitation: f64,
}

/// Parsed predictor output
#[derive(Debug, Clone, Deserialize)]
pub struct MlPrediction {
    pub location: Option<String>,
    pub probability: f64,
    pub confidence: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    /// Reported in km/h by the script
    pub wind_speed: Option<f64>,
}

/// Raw predictor output, accepted only if it parses as JSON without an error
/// field
#[derive(Debug, Deserialize)]
struct RawPredictorOutput {
    error: Option<String>,
    #[serde(flatten)]
    rest: serde_json::Value,
}

/// Parse one JSON object emitted by the predictor script
pub fn parse_predictor_output(stdout: &str) -> Result<MlPrediction, SourceError> {
    let raw: RawPredictorOutput = serde_json::from_str(stdout.trim())?;
    if let Some(error) = raw.error {
        return Err(SourceError::Malformed(format!(
            "predictor reported an error: {}",
            error
        )));
    }
    let prediction: MlPrediction = serde_json::from_value(raw.rest)?;
    Ok(prediction)
}

/// Client wrapping the spawned predictor process
pub struct MlProcessClient {
    interpreter: String,
    script_path: String,
    timeout: Duration,
    cache: TtlCache<String, MlPrediction>,
}

impl MlProcessClient {
    pub fn new(
        interpreter: String,
        script_path: String,
        timeout: Duration,
        cache_ttl: Duration,
    ) -> Self {
        Self::with_clock(
            interpreter,
            script_path,
            timeout,
            cache_ttl,
            Arc::new(SystemClock),
        )
    }

    pub fn with_clock(
        interpreter: String,
        script_path: String,
        timeout: Duration,
        cache_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            interpreter,
            script_path,
            timeout,
            cache: TtlCache::with_clock(cache_ttl, clock),
        }
    }

    /// Run the predictor for a feature vector, consulting the cache first.
    ///
    /// `cache_key` should be the `(lat, lon, date)` triple of the request so
    /// identical queries within the TTL reuse the previous subprocess result.
    pub async fn predict(
        &self,
        cache_key: &str,
        features: &FeatureVector,
    ) -> Result<MlPrediction, SourceError> {
        if let Some(cached) = self.cache.get(&cache_key.to_string()) {
            tracing::debug!("ML prediction cache hit for {}", cache_key);
            return Ok(cached);
        }

        let prediction = self.run_predictor(features).await?;
        self.cache.insert(cache_key.to_string(), prediction.clone());
        Ok(prediction)
    }

    async fn run_predictor(&self, features: &FeatureVector) -> Result<MlPrediction, SourceError> {
        let payload =
            serde_json::to_string(features).map_err(|e| SourceError::Malformed(e.to_string()))?;

        let child = Command::new(&self.interpreter)
            .arg(&self.script_path)
            .arg(&payload)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            // Dropping the wait future on timeout must terminate the child
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SourceError::Unavailable(format!("failed to spawn predictor: {}", e)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| SourceError::Timeout(self.timeout))?
            .map_err(|e| SourceError::Unavailable(format!("predictor I/O failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::Unavailable(format!(
                "predictor exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_predictor_output(&stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_output() {
        let stdout = r#"{
            "location": "Mumbai",
            "probability": 0.82,
            "confidence": "high",
            "temperature": 28.5,
            "humidity": 85,
            "wind_speed": 14.4
        }"#;
        let prediction = parse_predictor_output(stdout).unwrap();
        assert_eq!(prediction.probability, 0.82);
        assert_eq!(prediction.confidence.as_deref(), Some("high"));
        assert_eq!(prediction.wind_speed, Some(14.4));
    }

    #[test]
    fn test_error_field_is_rejected() {
        let stdout = r#"{"error": "model file not found"}"#;
        let result = parse_predictor_output(stdout);
        assert!(matches!(result, Err(SourceError::Malformed(_))));
    }

    #[test]
    fn test_non_json_is_rejected() {
        let result = parse_predictor_output("Traceback (most recent call last): ...");
        assert!(matches!(result, Err(SourceError::Malformed(_))));
    }

    #[test]
    fn test_feature_vector_serialization_uses_power_names() {
        let features = FeatureVector {
            lat: 19.076,
            lon: 72.8777,
            month: 7,
            day_of_year: 196,
            season: 2,
            climate_zone: "tropical".to_string(),
            temperature: 28.0,
            humidity: 85.0,
            wind_speed: 5.0,
            pressure: 1005.0,
            precipitation: 0.0,
        };
        let json = serde_json::to_value(&features).unwrap();
        assert!(json.get("T2M").is_some());
        assert!(json.get("RH2M").is_some());
        assert!(json.get("PRECTOTCORR").is_some());
        assert!(json.get("temperature").is_none());
    }
}
