//! In-process model training
//!
//! Builds a synthetic daily weather history for six reference cities
//! spanning distinct climate regimes, then fits the statistical model with
//! batch gradient descent against the synthetic rain probabilities.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::Serialize;
use shared::ClimateZone;

use crate::services::climate;
use crate::services::statistical::{RainModel, WeatherFeatures};

const LEARNING_RATE: f64 = 0.01;
const EPOCHS: usize = 100;
const START_YEAR: i32 = 2015;
const END_YEAR: i32 = 2024;

/// Reference cities with hand-assigned climate regimes
const SEED_CITIES: [(f64, f64, &str, ClimateRegime); 6] = [
    (19.0760, 72.8777, "Mumbai", ClimateRegime::TropicalMonsoon),
    (40.7128, -74.0060, "NewYork", ClimateRegime::Temperate),
    (51.5074, -0.1278, "London", ClimateRegime::TemperateOceanic),
    (35.6762, 139.6503, "Tokyo", ClimateRegime::HumidSubtropical),
    (-33.8688, 151.2093, "Sydney", ClimateRegime::TemperateOceanic),
    (30.0444, 31.2357, "Cairo", ClimateRegime::HotDesert),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClimateRegime {
    TropicalMonsoon,
    Temperate,
    TemperateOceanic,
    HumidSubtropical,
    HotDesert,
}

impl ClimateRegime {
    /// Monthly base rain probability per regime
    fn monthly_rain(&self) -> [f64; 12] {
        match self {
            Self::TropicalMonsoon => {
                [0.2, 0.15, 0.3, 0.4, 0.6, 0.85, 0.9, 0.85, 0.7, 0.5, 0.3, 0.25]
            }
            Self::Temperate => {
                [0.4, 0.35, 0.45, 0.5, 0.55, 0.6, 0.65, 0.6, 0.5, 0.45, 0.45, 0.4]
            }
            Self::TemperateOceanic => {
                [0.5, 0.45, 0.5, 0.45, 0.4, 0.35, 0.3, 0.35, 0.4, 0.5, 0.55, 0.5]
            }
            Self::HumidSubtropical => {
                [0.3, 0.35, 0.45, 0.5, 0.6, 0.7, 0.75, 0.7, 0.6, 0.4, 0.35, 0.3]
            }
            Self::HotDesert => {
                [0.05, 0.03, 0.08, 0.1, 0.05, 0.02, 0.01, 0.02, 0.03, 0.05, 0.08, 0.06]
            }
        }
    }
}

/// One synthetic day of history
#[derive(Debug, Clone)]
struct TrainingSample {
    lat: f64,
    lon: f64,
    date: NaiveDate,
    weather: WeatherFeatures,
    target: f64,
}

/// Summary of a completed training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub samples: usize,
    pub epochs: usize,
    pub final_loss: f64,
    pub accuracy: f64,
    pub mean_absolute_error: f64,
    pub zone_accuracy: Vec<ZoneAccuracy>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneAccuracy {
    pub zone: &'static str,
    pub correct: usize,
    pub total: usize,
}

/// Synthesize weather features for a regime, city, and date
fn generate_weather<R: Rng>(
    lat: f64,
    month: u32,
    regime: ClimateRegime,
    rng: &mut R,
) -> WeatherFeatures {
    let zone = ClimateZone::from_latitude(lat);
    let base_temp = climate::monthly_temperature(zone, month, lat);
    let seasonal = ((month as f64 - 1.0) * std::f64::consts::PI / 6.0).sin() * 5.0;
    let daily = (rng.gen::<f64>() - 0.5) * 8.0;

    let mut temperature = base_temp + seasonal + daily;
    let mut humidity = 60.0;
    let mut pressure = 1013.0;
    let mut wind = 5.0;

    match regime {
        ClimateRegime::TropicalMonsoon => {
            humidity = 70.0 + rng.gen::<f64>() * 25.0;
            if (6..=9).contains(&month) {
                humidity += 15.0;
                pressure -= 8.0;
                wind += 3.0;
            }
        }
        ClimateRegime::Temperate => {
            humidity = 55.0 + rng.gen::<f64>() * 30.0;
            pressure = 1010.0 + rng.gen::<f64>() * 20.0;
            wind = 3.0 + rng.gen::<f64>() * 6.0;
        }
        ClimateRegime::TemperateOceanic => {
            humidity = 65.0 + rng.gen::<f64>() * 20.0;
            pressure = 1015.0 + rng.gen::<f64>() * 15.0;
            wind = 4.0 + rng.gen::<f64>() * 5.0;
            temperature -= 2.0;
        }
        ClimateRegime::HumidSubtropical => {
            humidity = 65.0 + rng.gen::<f64>() * 25.0;
            if (6..=8).contains(&month) {
                humidity += 10.0;
                temperature += 3.0;
            }
        }
        ClimateRegime::HotDesert => {
            humidity = 20.0 + rng.gen::<f64>() * 30.0;
            pressure = 1015.0 + rng.gen::<f64>() * 10.0;
            wind = 2.0 + rng.gen::<f64>() * 4.0;
            temperature += 5.0;
        }
    }

    WeatherFeatures {
        temperature_c: temperature,
        humidity_pct: humidity.min(100.0),
        pressure_hpa: pressure,
        wind_speed_ms: wind,
    }
}

/// Target probability for a day given its synthetic weather
fn target_probability<R: Rng>(
    month: u32,
    weather: &WeatherFeatures,
    regime: ClimateRegime,
    rng: &mut R,
) -> f64 {
    let mut prob = regime.monthly_rain()[(month as usize - 1).min(11)];

    if weather.humidity_pct > 80.0 {
        prob *= 1.4;
    } else if weather.humidity_pct < 40.0 {
        prob *= 0.6;
    }

    if weather.pressure_hpa < 1000.0 {
        prob *= 1.3;
    } else if weather.pressure_hpa > 1020.0 {
        prob *= 0.7;
    }

    if weather.wind_speed_ms > 8.0 {
        prob *= 1.2;
    }

    // Convective uplift when hot, suppression when near freezing
    if weather.temperature_c > 30.0 {
        prob *= 1.1;
    } else if weather.temperature_c < 5.0 {
        prob *= 0.8;
    }

    prob += (rng.gen::<f64>() - 0.5) * 0.2;
    prob.clamp(0.01, 0.99)
}

/// Build the full synthetic history for all seed cities
fn build_dataset<R: Rng>(rng: &mut R) -> Vec<TrainingSample> {
    let mut samples = Vec::new();

    for (lat, lon, _name, regime) in SEED_CITIES {
        for year in START_YEAR..=END_YEAR {
            for month in 1u32..=12 {
                let mut day = 1u32;
                while let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    let weather = generate_weather(lat, month, regime, rng);
                    let target = target_probability(month, &weather, regime, rng);
                    samples.push(TrainingSample {
                        lat,
                        lon,
                        date,
                        weather,
                        target,
                    });
                    day += 1;
                }
            }
        }
    }

    samples
}

#[derive(Default)]
struct Gradients {
    latitude: f64,
    longitude: f64,
    month: f64,
    temperature: f64,
    humidity: f64,
    pressure: f64,
    wind_speed: f64,
    bias: f64,
}

/// Fit `model` in place against a freshly synthesized dataset and return a
/// report of the run
pub fn train<R: Rng>(model: &mut RainModel, rng: &mut R) -> TrainingReport {
    let dataset = build_dataset(rng);
    let n = dataset.len() as f64;
    tracing::info!(samples = dataset.len(), epochs = EPOCHS, "starting model training");

    let mut final_loss = 0.0;

    for epoch in 0..EPOCHS {
        let mut total_loss = 0.0;
        let mut grads = Gradients::default();

        for sample in &dataset {
            let predicted =
                model.raw_probability(sample.lat, sample.lon, sample.date, Some(&sample.weather));
            let error = predicted - sample.target;
            total_loss += error * error;

            // MSE through the sigmoid
            let factor = 2.0 * error * predicted * (1.0 - predicted);

            grads.latitude += factor * (sample.lat / 30.0);
            grads.longitude += factor * (sample.lon / 60.0);
            grads.month += factor * (sample.date.month() as f64 / 12.0);
            grads.temperature += factor * ((sample.weather.temperature_c - 20.0) / 15.0);
            grads.humidity += factor * ((sample.weather.humidity_pct - 65.0) / 20.0);
            grads.pressure += factor * ((sample.weather.pressure_hpa - 1013.0) / 15.0);
            grads.wind_speed += factor * ((sample.weather.wind_speed_ms - 5.0) / 3.0);
            grads.bias += factor;
        }

        let w = &mut model.weights;
        w.latitude -= LEARNING_RATE * (grads.latitude / n);
        w.longitude -= LEARNING_RATE * (grads.longitude / n);
        w.month -= LEARNING_RATE * (grads.month / n);
        w.temperature -= LEARNING_RATE * (grads.temperature / n);
        w.humidity -= LEARNING_RATE * (grads.humidity / n);
        w.pressure -= LEARNING_RATE * (grads.pressure / n);
        w.wind_speed -= LEARNING_RATE * (grads.wind_speed / n);
        w.bias -= LEARNING_RATE * (grads.bias / n);

        final_loss = total_loss / n;
        if epoch % 20 == 0 {
            tracing::debug!(epoch, avg_loss = final_loss, "training epoch");
        }
    }

    let report = evaluate(model, &dataset, final_loss);
    tracing::info!(
        accuracy = report.accuracy,
        mae = report.mean_absolute_error,
        "training completed"
    );
    report
}

fn evaluate(model: &RainModel, dataset: &[TrainingSample], final_loss: f64) -> TrainingReport {
    let mut correct = 0usize;
    let mut total_error = 0.0;
    let mut zone_hits: Vec<(ClimateZone, usize, usize)> = Vec::new();

    for sample in dataset {
        let predicted =
            model.raw_probability(sample.lat, sample.lon, sample.date, Some(&sample.weather));
        let predicted_class = predicted > 0.5;
        let actual_class = sample.target > 0.5;
        let hit = predicted_class == actual_class;

        if hit {
            correct += 1;
        }
        total_error += (predicted - sample.target).abs();

        let zone = ClimateZone::from_latitude(sample.lat);
        match zone_hits.iter_mut().find(|(z, _, _)| *z == zone) {
            Some((_, hits, total)) => {
                *hits += usize::from(hit);
                *total += 1;
            }
            None => zone_hits.push((zone, usize::from(hit), 1)),
        }
    }

    TrainingReport {
        samples: dataset.len(),
        epochs: EPOCHS,
        final_loss,
        accuracy: correct as f64 / dataset.len() as f64,
        mean_absolute_error: total_error / dataset.len() as f64,
        zone_accuracy: zone_hits
            .into_iter()
            .map(|(zone, correct, total)| ZoneAccuracy {
                zone: zone.name(),
                correct,
                total,
            })
            .collect(),
    }
}
