//! Statistical rain model
//!
//! Logistic regression over geographic, calendar, and (optional) live
//! weather features, plus categorical climate-zone and regional-pattern
//! contributions. Ships with pretrained weights and can be retrained in
//! process from synthetic history (see `trainer`).

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use shared::{clamp_probability, ClimateZone, Confidence};

use crate::services::climate;

/// Source tag reported by this model
pub const SOURCE_TAG: &str = "statistical-model";

/// Per-feature normalization parameters (mean, standard deviation)
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl FeatureStats {
    const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    fn normalize(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }
}

/// Live weather observations fed into the model when a current reading exists
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherFeatures {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub wind_speed_ms: f64,
}

/// Trainable numeric weights of the model
#[derive(Debug, Clone, Serialize)]
pub struct ModelWeights {
    pub latitude: f64,
    pub longitude: f64,
    pub month: f64,
    pub day_of_year: f64,
    pub season: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub bias: f64,
}

impl Default for ModelWeights {
    fn default() -> Self {
        Self {
            latitude: -0.012,
            longitude: 0.003,
            month: 0.15,
            day_of_year: -0.001,
            season: 0.08,
            temperature: -0.02,
            humidity: 0.025,
            pressure: -0.018,
            wind_speed: 0.01,
            bias: 0.25,
        }
    }
}

/// Logistic rain model with fixed normalization statistics
#[derive(Debug, Clone)]
pub struct RainModel {
    pub weights: ModelWeights,
    lat_stats: FeatureStats,
    lon_stats: FeatureStats,
    temp_stats: FeatureStats,
    humidity_stats: FeatureStats,
    pressure_stats: FeatureStats,
    wind_stats: FeatureStats,
}

impl Default for RainModel {
    fn default() -> Self {
        Self {
            weights: ModelWeights::default(),
            lat_stats: FeatureStats::new(0.0, 30.0),
            lon_stats: FeatureStats::new(0.0, 60.0),
            temp_stats: FeatureStats::new(20.0, 15.0),
            humidity_stats: FeatureStats::new(65.0, 20.0),
            pressure_stats: FeatureStats::new(1013.0, 15.0),
            wind_stats: FeatureStats::new(5.0, 3.0),
        }
    }
}

/// Prediction with the contributing feature scores exposed for display
#[derive(Debug, Clone, Serialize)]
pub struct StatisticalPrediction {
    pub probability: f64,
    pub confidence: Confidence,
    pub source: &'static str,
    pub explain: ScoreBreakdown,
}

/// Raw score contributions before the sigmoid
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub geographic: f64,
    pub calendar: f64,
    pub climate_zone: f64,
    pub regional: f64,
    pub weather: f64,
    pub bias: f64,
    pub total: f64,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn zone_weight(zone: ClimateZone) -> f64 {
    match zone {
        ClimateZone::Equatorial => 0.6,
        ClimateZone::Tropical => 0.4,
        ClimateZone::Subtropical => 0.2,
        ClimateZone::Temperate => 0.3,
        ClimateZone::Polar => 0.15,
    }
}

/// Quarter index 0..3 (Jan-Mar = 0, Oct-Dec = 3)
fn season_index(month: u32) -> f64 {
    ((month - 1) / 3) as f64
}

impl RainModel {
    /// Compute the pre-sigmoid score decomposed per feature family
    pub fn score(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
        weather: Option<&WeatherFeatures>,
    ) -> ScoreBreakdown {
        let w = &self.weights;
        let month = date.month() as f64;
        let day_of_year = date.ordinal() as f64;

        let geographic = w.latitude * self.lat_stats.normalize(lat)
            + w.longitude * self.lon_stats.normalize(lon);

        let calendar = w.month * (month / 12.0)
            + w.day_of_year * (day_of_year / 365.0)
            + w.season * (season_index(date.month()) / 4.0);

        let climate_zone = zone_weight(ClimateZone::from_latitude(lat));

        let mut regional = 0.0;
        if climate::in_monsoon_band(lat, lon) {
            regional += 0.8;
        }
        if climate::in_mediterranean_band(lat, lon) {
            regional += -0.3;
        }
        if climate::in_desert_region(lat, lon) {
            regional += -0.7;
        }

        let weather_score = weather.map_or(0.0, |obs| {
            w.temperature * self.temp_stats.normalize(obs.temperature_c)
                + w.humidity * self.humidity_stats.normalize(obs.humidity_pct)
                + w.pressure * self.pressure_stats.normalize(obs.pressure_hpa)
                + w.wind_speed * self.wind_stats.normalize(obs.wind_speed_ms)
        });

        let total =
            geographic + calendar + climate_zone + regional + weather_score + w.bias;

        ScoreBreakdown {
            geographic,
            calendar,
            climate_zone,
            regional,
            weather: weather_score,
            bias: w.bias,
            total,
        }
    }

    /// Evaluate the model for a location and date
    pub fn predict(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
        weather: Option<&WeatherFeatures>,
    ) -> StatisticalPrediction {
        let explain = self.score(lat, lon, date, weather);
        let probability = clamp_probability(sigmoid(explain.total));

        let confidence = if probability > 0.8 || probability < 0.2 {
            Confidence::High
        } else if probability > 0.65 || probability < 0.35 {
            Confidence::Medium
        } else {
            Confidence::Low
        };

        StatisticalPrediction {
            probability,
            confidence,
            source: SOURCE_TAG,
            explain,
        }
    }

    /// Raw probability without the clamp, used by the trainer's loss
    pub(crate) fn raw_probability(
        &self,
        lat: f64,
        lon: f64,
        date: NaiveDate,
        weather: Option<&WeatherFeatures>,
    ) -> f64 {
        sigmoid(self.score(lat, lon, date, weather).total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_season_is_quarter_index() {
        assert_eq!(season_index(1), 0.0);
        assert_eq!(season_index(3), 0.0);
        assert_eq!(season_index(4), 1.0);
        assert_eq!(season_index(9), 2.0);
        assert_eq!(season_index(10), 3.0);
        assert_eq!(season_index(12), 3.0);
    }

    #[test]
    fn test_december_carries_full_season_weight() {
        // Dec 31 vs Jan 1: the calendar term drops by a full season step plus
        // the month step across the year boundary
        let model = RainModel::default();
        let december = model.score(48.85, 2.35, date(2025, 12, 31), None);
        let january = model.score(48.85, 2.35, date(2026, 1, 1), None);
        let w = &model.weights;

        let expected_step = w.season * (3.0 / 4.0) + w.month * (11.0 / 12.0)
            + w.day_of_year * (364.0 / 365.0);
        assert!((december.calendar - january.calendar - expected_step).abs() < 1e-9);
    }

    #[test]
    fn test_mumbai_monsoon_scores_high() {
        let model = RainModel::default();
        let prediction = model.predict(19.0760, 72.8777, date(2025, 7, 15), None);
        assert!(prediction.probability > 0.7, "got {}", prediction.probability);
        assert!(prediction.explain.regional >= 0.8);
    }

    #[test]
    fn test_sahara_scores_low() {
        let model = RainModel::default();
        let prediction = model.predict(25.0, 15.0, date(2025, 10, 1), None);
        assert!(prediction.probability < 0.5, "got {}", prediction.probability);
        assert_eq!(prediction.explain.regional, -0.7);
    }

    #[test]
    fn test_humid_reading_raises_score() {
        let model = RainModel::default();
        let humid = WeatherFeatures {
            temperature_c: 22.0,
            humidity_pct: 95.0,
            pressure_hpa: 1000.0,
            wind_speed_ms: 6.0,
        };
        let dry = WeatherFeatures {
            temperature_c: 30.0,
            humidity_pct: 20.0,
            pressure_hpa: 1025.0,
            wind_speed_ms: 2.0,
        };
        let d = date(2025, 5, 10);
        let p_humid = model.predict(48.85, 2.35, d, Some(&humid)).probability;
        let p_dry = model.predict(48.85, 2.35, d, Some(&dry)).probability;
        assert!(p_humid > p_dry);
    }

    #[test]
    fn test_confidence_bands() {
        // Force known probabilities through the band logic via the clamp
        let model = RainModel::default();
        let p = model.predict(19.0760, 72.8777, date(2025, 7, 15), None);
        match p.probability {
            x if x > 0.8 => assert_eq!(p.confidence, Confidence::High),
            x if x > 0.65 => assert_eq!(p.confidence, Confidence::Medium),
            _ => {}
        }
    }

    proptest! {
        #[test]
        fn prop_probability_clamped(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let model = RainModel::default();
            let p = model.predict(lat, lon, date(2025, month, day), None);
            prop_assert!((0.05..=0.95).contains(&p.probability));
        }
    }
}
