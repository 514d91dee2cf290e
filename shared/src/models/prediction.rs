//! The canonical prediction record
//!
//! Every prediction source normalizes its output into [`Prediction`] so the
//! frontend and the recommendation engine consume a single contract.

use serde::{Deserialize, Serialize};

/// Probabilities are clamped into this band to avoid overconfident 0/1 output
pub const PROBABILITY_FLOOR: f64 = 0.05;
pub const PROBABILITY_CEILING: f64 = 0.95;

/// Clamp a raw probability into the canonical band
pub fn clamp_probability(p: f64) -> f64 {
    p.clamp(PROBABILITY_FLOOR, PROBABILITY_CEILING)
}

/// User-facing categorical rain prediction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Verdict {
    Rain,
    #[serde(rename = "No rain")]
    NoRain,
    Uncertain,
}

impl Verdict {
    /// Weather condition group a verdict maps to when synthesizing details
    pub fn weather_main(&self) -> &'static str {
        match self {
            Verdict::Rain => "Rain",
            Verdict::Uncertain => "Clouds",
            Verdict::NoRain => "Clear",
        }
    }

    pub fn weather_description(&self) -> &'static str {
        match self {
            Verdict::Rain => "light rain",
            Verdict::Uncertain => "scattered clouds",
            Verdict::NoRain => "clear sky",
        }
    }
}

/// Confidence level attached to a verdict
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// The canonical prediction record — the output contract of the resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Display string for the queried location
    pub location: String,
    /// Target date in ISO form (YYYY-MM-DD)
    pub date: String,
    pub verdict: Verdict,
    /// Always within [0.05, 0.95] post-normalization
    pub probability: f64,
    pub confidence: Confidence,
    /// Tags of the sources that actually contributed, never empty
    pub source: Vec<String>,
    /// Human-readable explanation
    pub reasoning: String,
    pub details: PredictionDetails,
}

/// Hourly and daily breakdown backing the verdict
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionDetails {
    pub hourly: Vec<HourlyDetail>,
    pub daily: DailyDetail,
}

/// One hourly forecast slice for the target date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyDetail {
    /// ISO timestamp
    pub time: String,
    /// Probability of precipitation for the hour (0-1)
    pub pop: f64,
    /// Rain plus snow volume in mm
    pub precipitation: f64,
    pub temp: f64,
    pub humidity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherCondition>,
}

/// Daily aggregates for the target date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyDetail {
    pub temp: DailyTemperature,
    pub humidity: f64,
    pub wind_speed: f64,
    pub pressure: f64,
    pub clouds: f64,
    pub weather: WeatherCondition,
}

impl Default for DailyDetail {
    fn default() -> Self {
        Self {
            temp: DailyTemperature::default(),
            humidity: 60.0,
            wind_speed: 5.0,
            pressure: 1013.0,
            clouds: 30.0,
            weather: WeatherCondition::default(),
        }
    }
}

/// Day-part temperatures in Celsius
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub day: f64,
    pub morn: f64,
    pub eve: f64,
    pub night: f64,
}

impl DailyTemperature {
    /// Spread a single daytime estimate across the day parts
    pub fn from_day_temp(day: f64) -> Self {
        Self {
            day,
            morn: day - 4.0,
            eve: day - 2.0,
            night: day - 7.0,
        }
    }
}

impl Default for DailyTemperature {
    fn default() -> Self {
        Self {
            day: 20.0,
            morn: 15.0,
            eve: 18.0,
            night: 12.0,
        }
    }
}

/// Weather condition group and description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
}

impl WeatherCondition {
    pub fn for_verdict(verdict: Verdict) -> Self {
        Self {
            main: verdict.weather_main().to_string(),
            description: verdict.weather_description().to_string(),
        }
    }
}

impl Default for WeatherCondition {
    fn default() -> Self {
        Self {
            main: "Clear".to_string(),
            description: "clear sky".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_verdict_serialization() {
        assert_eq!(
            serde_json::to_string(&Verdict::NoRain).unwrap(),
            "\"No rain\""
        );
        assert_eq!(serde_json::to_string(&Verdict::Rain).unwrap(), "\"Rain\"");
        assert_eq!(
            serde_json::to_string(&Confidence::High).unwrap(),
            "\"high\""
        );
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    proptest! {
        #[test]
        fn prop_clamped_probability_in_band(p in -1.0f64..2.0) {
            let clamped = clamp_probability(p);
            prop_assert!((PROBABILITY_FLOOR..=PROBABILITY_CEILING).contains(&clamped));
        }
    }
}
