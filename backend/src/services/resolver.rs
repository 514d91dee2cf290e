//! Prediction resolution cascade
//!
//! Sources are tried in a fixed order and the first one that yields a
//! structurally valid prediction wins. A tier failure is logged and the
//! resolver advances; the final tier is deterministic and cannot fail, so
//! every valid request produces a prediction.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rand::Rng;
use shared::{
    clamp_probability, ClimateZone, DailyDetail, DailyTemperature, HourlyDetail, Prediction,
    PredictionDetails, Verdict, WeatherCondition,
};

use crate::error::{AppError, SourceError};
use crate::external::gemini::{extract_json_object, strip_code_fences, GeminiClient};
use crate::external::ml_process::{FeatureVector, MlPrediction, MlProcessClient};
use crate::external::weather::{CurrentWeather, DailyForecast, HourlyForecast, WeatherClient};
use crate::services::climate;
use crate::services::statistical::{RainModel, WeatherFeatures};
use crate::services::verdict::{derive_verdict, forecast_reasoning};

/// A validated prediction query
#[derive(Debug, Clone, Copy)]
pub struct PredictionRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
}

/// Shared per-request context handed to every source
pub struct SourceContext {
    pub request: PredictionRequest,
    /// Resolution date, injected so historical framing is testable
    pub today: NaiveDate,
    /// Best-effort current conditions, fetched once up front
    pub current_weather: Option<CurrentWeather>,
}

impl SourceContext {
    /// Display label for the queried location
    pub fn location_label(&self) -> String {
        match &self.current_weather {
            Some(weather) => weather.display_name(),
            None => format!("{}, {}", self.request.latitude, self.request.longitude),
        }
    }

    /// Whether the target date lies in the past relative to resolution time
    pub fn is_historical(&self) -> bool {
        self.request.date < self.today
    }

    fn date_string(&self) -> String {
        self.request.date.format("%Y-%m-%d").to_string()
    }

    /// Live observations shaped for the statistical model, when present
    fn weather_features(&self) -> Option<WeatherFeatures> {
        let current = self.current_weather.as_ref()?;
        Some(WeatherFeatures {
            temperature_c: current.temperature_c.unwrap_or(20.0),
            humidity_pct: current.humidity_pct.unwrap_or(60.0),
            pressure_hpa: current.pressure_hpa.unwrap_or(1013.0),
            wind_speed_ms: current.wind_speed_ms.unwrap_or(5.0),
        })
    }
}

pub type SourceFuture<'a> = Pin<Box<dyn Future<Output = Result<Prediction, SourceError>> + Send + 'a>>;

/// One tier of the prediction cascade.
///
/// Implementors box their futures by hand so the trait stays object-safe and
/// the resolver can hold a heterogeneous `Vec<Box<dyn PredictionSource>>`.
pub trait PredictionSource: Send + Sync {
    fn name(&self) -> &'static str;
    fn resolve<'a>(&'a self, ctx: &'a SourceContext) -> SourceFuture<'a>;
}

/// Tier 1: the out-of-process trained predictor
pub struct MlSource {
    client: Arc<MlProcessClient>,
}

impl MlSource {
    pub fn new(client: Arc<MlProcessClient>) -> Self {
        Self { client }
    }

    fn build_features(ctx: &SourceContext) -> FeatureVector {
        let request = &ctx.request;
        let weather = ctx.weather_features().unwrap_or(WeatherFeatures {
            temperature_c: 20.0,
            humidity_pct: 60.0,
            pressure_hpa: 1013.0,
            wind_speed_ms: 5.0,
        });

        FeatureVector {
            lat: request.latitude,
            lon: request.longitude,
            month: request.date.month(),
            day_of_year: request.date.ordinal(),
            season: (request.date.month() - 1) / 3,
            climate_zone: ClimateZone::from_latitude(request.latitude)
                .name()
                .to_string(),
            temperature: weather.temperature_c,
            humidity: weather.humidity_pct,
            wind_speed: weather.wind_speed_ms,
            pressure: weather.pressure_hpa,
            precipitation: 0.0,
        }
    }

    fn to_prediction(ml: MlPrediction, ctx: &SourceContext) -> Prediction {
        let probability = clamp_probability(ml.probability);
        let (verdict, confidence) = derive_verdict(probability, 0.0);

        let location = ml
            .location
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| ctx.location_label());
        let day_temp = ml.temperature.unwrap_or(20.0);

        Prediction {
            location: location.clone(),
            date: ctx.date_string(),
            verdict,
            probability,
            confidence,
            source: vec!["ml_model".to_string()],
            reasoning: format!(
                "ML prediction based on historical weather patterns for {}",
                location
            ),
            details: PredictionDetails {
                hourly: Vec::new(),
                daily: DailyDetail {
                    temp: DailyTemperature {
                        day: day_temp,
                        morn: day_temp - 3.0,
                        eve: day_temp - 1.0,
                        night: day_temp - 5.0,
                    },
                    humidity: ml.humidity.unwrap_or(60.0),
                    // The predictor reports km/h
                    wind_speed: ml.wind_speed.unwrap_or(18.0) / 3.6,
                    pressure: 1013.0,
                    clouds: (probability * 80.0).round(),
                    weather: WeatherCondition::for_verdict(verdict),
                },
            },
        }
    }
}

impl PredictionSource for MlSource {
    fn name(&self) -> &'static str {
        "ml_model"
    }

    fn resolve<'a>(&'a self, ctx: &'a SourceContext) -> SourceFuture<'a> {
        Box::pin(async move {
            let request = &ctx.request;
            let cache_key = format!(
                "{:.4},{:.4},{}",
                request.latitude,
                request.longitude,
                request.date
            );
            let features = Self::build_features(ctx);
            let ml = self.client.predict(&cache_key, &features).await?;
            Ok(Self::to_prediction(ml, ctx))
        })
    }
}

/// Tier 2: the live OpenWeatherMap forecast
pub struct ForecastSource {
    client: WeatherClient,
}

impl ForecastSource {
    pub fn new(client: WeatherClient) -> Self {
        Self { client }
    }

    fn hourly_for_date(hourly: &[HourlyForecast], date: NaiveDate) -> Vec<HourlyDetail> {
        hourly
            .iter()
            .filter_map(|hour| {
                let timestamp = DateTime::<Utc>::from_timestamp(hour.dt, 0)?;
                if timestamp.date_naive() != date {
                    return None;
                }
                let precipitation = hour.rain.as_ref().map_or(0.0, |r| r.volume())
                    + hour.snow.as_ref().map_or(0.0, |s| s.volume());
                Some(HourlyDetail {
                    time: timestamp.to_rfc3339(),
                    pop: hour.pop.unwrap_or(0.0),
                    precipitation,
                    temp: hour.temp.unwrap_or(20.0),
                    humidity: hour.humidity.unwrap_or(60.0),
                    weather: hour.weather.first().map(|w| WeatherCondition {
                        main: w.main.clone(),
                        description: w.description.clone(),
                    }),
                })
            })
            .collect()
    }

    fn from_forecast(day: &DailyForecast, hourly: Vec<HourlyDetail>, ctx: &SourceContext) -> Prediction {
        let daily_pop = day.pop.unwrap_or(0.0);
        let precipitation = day.rain.as_ref().map_or(0.0, |r| r.volume())
            + day.snow.as_ref().map_or(0.0, |s| s.volume());

        // Prefer the stronger of the daily pop and the hourly average
        let combined_pop = if hourly.is_empty() {
            daily_pop
        } else {
            let hourly_avg = hourly.iter().map(|h| h.pop).sum::<f64>() / hourly.len() as f64;
            daily_pop.max(hourly_avg)
        };

        // Verdict from the raw pop, but the reported probability stays in the
        // canonical band like every other tier's.
        let (verdict, confidence) = derive_verdict(combined_pop, precipitation);
        let probability = clamp_probability(combined_pop);

        let temp = day
            .temp
            .as_ref()
            .map(|t| DailyTemperature {
                day: t.day.unwrap_or(20.0),
                morn: t.morn.unwrap_or(15.0),
                eve: t.eve.unwrap_or(18.0),
                night: t.night.unwrap_or(12.0),
            })
            .unwrap_or_default();

        Prediction {
            location: ctx.location_label(),
            date: ctx.date_string(),
            verdict,
            probability,
            confidence,
            source: vec!["openweathermap".to_string()],
            reasoning: forecast_reasoning(verdict, combined_pop, precipitation),
            details: PredictionDetails {
                hourly,
                daily: DailyDetail {
                    temp,
                    humidity: day.humidity.unwrap_or(60.0),
                    wind_speed: day.wind_speed.unwrap_or(5.0),
                    pressure: day.pressure.unwrap_or(1013.0),
                    clouds: day.clouds.unwrap_or(30.0),
                    weather: day
                        .weather
                        .first()
                        .map(|w| WeatherCondition {
                            main: w.main.clone(),
                            description: w.description.clone(),
                        })
                        .unwrap_or_default(),
                },
            },
        }
    }

    /// Seasonal estimate for dates beyond the forecast horizon
    fn simple_prediction(ctx: &SourceContext) -> Prediction {
        let request = &ctx.request;
        let lat = request.latitude;
        let lon = request.longitude;
        let month = request.date.month();
        let days_ahead = (request.date - ctx.today).num_days().max(0);

        let mut probability: f64 = if (6..=9).contains(&month) {
            0.4
        } else if month == 12 || month <= 2 {
            0.25
        } else {
            0.3
        };

        if lat.abs() < 23.5 {
            probability += 0.1;
        }
        // South Asian monsoon belt
        if lat > 10.0 && lat < 30.0 && lon > 70.0 && lon < 90.0 {
            probability += 0.2;
        }
        probability = probability.clamp(0.1, 0.8);

        let (verdict, confidence) = derive_verdict(probability, 0.0);
        let lat_offset = (lat * 0.1).sin() * 10.0;

        Prediction {
            location: ctx.location_label(),
            date: ctx.date_string(),
            verdict,
            probability,
            confidence,
            source: vec!["climate_forecast".to_string()],
            reasoning: format!(
                "Extended forecast based on seasonal patterns ({} days ahead)",
                days_ahead
            ),
            details: PredictionDetails {
                hourly: Vec::new(),
                daily: DailyDetail {
                    temp: DailyTemperature {
                        day: (25.0 + lat_offset).round(),
                        morn: (22.0 + lat_offset).round(),
                        eve: (24.0 + lat_offset).round(),
                        night: (20.0 + lat_offset).round(),
                    },
                    humidity: (60.0 + probability * 20.0).round(),
                    wind_speed: 5.0,
                    pressure: 1013.0,
                    clouds: (probability * 70.0).round(),
                    weather: WeatherCondition::for_verdict(verdict),
                },
            },
        }
    }
}

impl PredictionSource for ForecastSource {
    fn name(&self) -> &'static str {
        "openweathermap"
    }

    fn resolve<'a>(&'a self, ctx: &'a SourceContext) -> SourceFuture<'a> {
        Box::pin(async move {
            let request = &ctx.request;
            let forecast = self
                .client
                .get_forecast(request.latitude, request.longitude)
                .await?;

            let target = forecast.daily.iter().find(|day| {
                DateTime::<Utc>::from_timestamp(day.dt, 0)
                    .map(|dt| dt.date_naive() == request.date)
                    .unwrap_or(false)
            });

            match target {
                Some(day) => {
                    let hourly = Self::hourly_for_date(&forecast.hourly, request.date);
                    Ok(Self::from_forecast(day, hourly, ctx))
                }
                None => Ok(Self::simple_prediction(ctx)),
            }
        })
    }
}

/// Shape the generative model is asked to reply in
#[derive(Debug, serde::Deserialize)]
struct GeminiForecast {
    probability: f64,
    verdict: Verdict,
    confidence: shared::Confidence,
    reasoning: Option<String>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    conditions: Option<String>,
}

/// Tier 3: generative AI estimate
pub struct GeminiSource {
    client: GeminiClient,
}

impl GeminiSource {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    fn build_prompt(ctx: &SourceContext) -> String {
        let request = &ctx.request;
        let historical = ctx.is_historical();
        let analysis_type = if historical {
            "historical analysis"
        } else {
            "weather prediction"
        };
        let date_note = if historical {
            "(HISTORICAL DATE)"
        } else {
            "(FUTURE DATE)"
        };
        let data_basis = if historical {
            "Historical climate records and typical weather patterns"
        } else {
            "Current conditions and forecast models"
        };
        let reasoning_basis = if historical {
            "historical climate data"
        } else {
            "forecast analysis"
        };

        let current_info = match &ctx.current_weather {
            Some(w) => format!(
                "Current weather: {}, temp: {}°C, humidity: {}%",
                w.description.as_deref().unwrap_or("unknown"),
                w.temperature_c.unwrap_or(20.0),
                w.humidity_pct.unwrap_or(60.0)
            ),
            None => "No current weather data available".to_string(),
        };

        format!(
            "You are a meteorologist. Provide {analysis_type} for:\n\
             Location: {lat}°N, {lon}°E\n\
             Date: {date} {date_note}\n\
             {current_info}\n\n\
             Consider:\n\
             - Geographic location and climate zone\n\
             - Seasonal patterns for this region\n\
             - Month: {month}, Year: {year}\n\
             - {data_basis}\n\n\
             Respond with ONLY a JSON object in this exact format:\n\
             {{\n\
               \"probability\": 0.XX,\n\
               \"verdict\": \"Rain|No rain|Uncertain\",\n\
               \"confidence\": \"high|medium|low\",\n\
               \"reasoning\": \"brief explanation mentioning {reasoning_basis}\",\n\
               \"temperature\": XX,\n\
               \"humidity\": XX,\n\
               \"conditions\": \"description\"\n\
             }}\n\n\
             Probability should be realistic (0.05-0.95). Be accurate based on actual climate data.",
            lat = request.latitude,
            lon = request.longitude,
            date = request.date,
            month = request.date.month(),
            year = request.date.year(),
        )
    }

    fn parse_completion(text: &str) -> Result<GeminiForecast, SourceError> {
        let cleaned = strip_code_fences(text);
        let object = extract_json_object(&cleaned)
            .ok_or_else(|| SourceError::Malformed("no JSON object in completion".to_string()))?;
        Ok(serde_json::from_str(object)?)
    }

    fn to_prediction(forecast: GeminiForecast, ctx: &SourceContext) -> Prediction {
        let probability = clamp_probability(forecast.probability);
        // The AI's own verdict and confidence are trusted as-is
        let verdict = forecast.verdict;

        let source = if ctx.is_historical() {
            vec!["historical_analysis".to_string(), "gemini_ai".to_string()]
        } else if ctx.current_weather.is_some() {
            vec!["gemini_ai".to_string(), "openweathermap".to_string()]
        } else {
            vec!["gemini_ai".to_string()]
        };

        let current = ctx.current_weather.as_ref();
        let day_temp = forecast.temperature.unwrap_or(20.0);

        Prediction {
            location: ctx.location_label(),
            date: ctx.date_string(),
            verdict,
            probability,
            confidence: forecast.confidence,
            source,
            reasoning: forecast
                .reasoning
                .unwrap_or_else(|| "AI assessment of regional climate patterns".to_string()),
            details: PredictionDetails {
                hourly: Vec::new(),
                daily: DailyDetail {
                    temp: DailyTemperature::from_day_temp(day_temp),
                    humidity: forecast.humidity.unwrap_or(60.0),
                    wind_speed: current.and_then(|w| w.wind_speed_ms).unwrap_or(5.0),
                    pressure: current.and_then(|w| w.pressure_hpa).unwrap_or(1013.0),
                    clouds: (probability * 80.0).round(),
                    weather: WeatherCondition {
                        main: verdict.weather_main().to_string(),
                        description: forecast
                            .conditions
                            .unwrap_or_else(|| verdict.weather_description().to_string()),
                    },
                },
            },
        }
    }
}

impl PredictionSource for GeminiSource {
    fn name(&self) -> &'static str {
        "gemini_ai"
    }

    fn resolve<'a>(&'a self, ctx: &'a SourceContext) -> SourceFuture<'a> {
        Box::pin(async move {
            let prompt = Self::build_prompt(ctx);
            let completion = self.client.generate(&prompt).await?;
            let forecast = Self::parse_completion(&completion)?;
            Ok(Self::to_prediction(forecast, ctx))
        })
    }
}

/// Tier 4: deterministic climate estimate, blending the zone-table heuristic
/// with the statistical model. Never fails.
pub struct FallbackSource {
    model: Arc<RwLock<RainModel>>,
}

/// Heuristic/statistical blend ratio
const HEURISTIC_WEIGHT: f64 = 0.7;
const STATISTICAL_WEIGHT: f64 = 0.3;

impl FallbackSource {
    pub fn new(model: Arc<RwLock<RainModel>>) -> Self {
        Self { model }
    }

    fn compute(&self, ctx: &SourceContext) -> Prediction {
        let request = &ctx.request;
        let mut rng = rand::thread_rng();

        let heuristic = climate::predict(request.latitude, request.longitude, request.date, &mut rng);
        let statistical = {
            let model = self.model.read().unwrap_or_else(|e| e.into_inner());
            model.predict(
                request.latitude,
                request.longitude,
                request.date,
                ctx.weather_features().as_ref(),
            )
        };

        let probability = clamp_probability(
            heuristic.rain_probability * HEURISTIC_WEIGHT
                + statistical.probability * STATISTICAL_WEIGHT,
        );
        let (verdict, confidence) = derive_verdict(probability, 0.0);

        let (source_tag, reasoning) = if ctx.is_historical() {
            (
                "historical_analysis",
                "Historical climate analysis for this region and season",
            )
        } else {
            (
                "climate_forecast",
                "Climate-based prediction for this region and season",
            )
        };

        let base_temp = heuristic.avg_temp.round();

        Prediction {
            location: ctx.location_label(),
            date: ctx.date_string(),
            verdict,
            probability,
            confidence,
            source: vec![source_tag.to_string()],
            reasoning: reasoning.to_string(),
            details: PredictionDetails {
                hourly: Vec::new(),
                daily: DailyDetail {
                    temp: DailyTemperature {
                        day: base_temp,
                        morn: base_temp - 4.0,
                        eve: base_temp - 2.0,
                        night: base_temp - 7.0,
                    },
                    humidity: (50.0 + probability * 30.0).round(),
                    wind_speed: ((3.0 + rng.gen::<f64>() * 4.0) * 10.0).round() / 10.0,
                    pressure: (1013.0 + (rng.gen::<f64>() - 0.5) * 20.0).round(),
                    clouds: (probability * 80.0).round(),
                    weather: WeatherCondition::for_verdict(verdict),
                },
            },
        }
    }
}

impl PredictionSource for FallbackSource {
    fn name(&self) -> &'static str {
        "climate_fallback"
    }

    fn resolve<'a>(&'a self, ctx: &'a SourceContext) -> SourceFuture<'a> {
        Box::pin(async move { Ok(self.compute(ctx)) })
    }
}

/// Orchestrates the source cascade for a validated request
pub struct PredictionResolver {
    weather: WeatherClient,
    sources: Vec<Box<dyn PredictionSource>>,
}

impl PredictionResolver {
    pub fn new(weather: WeatherClient, sources: Vec<Box<dyn PredictionSource>>) -> Self {
        Self { weather, sources }
    }

    /// Standard four-tier chain: ML predictor, live forecast, generative AI,
    /// deterministic climate blend
    pub fn with_default_sources(
        weather: WeatherClient,
        ml_client: Arc<MlProcessClient>,
        gemini: GeminiClient,
        model: Arc<RwLock<RainModel>>,
    ) -> Self {
        let sources: Vec<Box<dyn PredictionSource>> = vec![
            Box::new(MlSource::new(ml_client)),
            Box::new(ForecastSource::new(weather.clone())),
            Box::new(GeminiSource::new(gemini)),
            Box::new(FallbackSource::new(model)),
        ];
        Self::new(weather, sources)
    }

    pub async fn resolve(&self, request: PredictionRequest) -> Result<Prediction, AppError> {
        let current_weather = match self
            .weather
            .get_current_weather(request.latitude, request.longitude)
            .await
        {
            Ok(weather) => Some(weather),
            Err(e) => {
                tracing::warn!("current weather lookup failed: {}", e);
                None
            }
        };

        let ctx = SourceContext {
            request,
            today: Utc::now().date_naive(),
            current_weather,
        };

        self.resolve_with_context(&ctx).await
    }

    /// Run the cascade against a prepared context
    pub async fn resolve_with_context(&self, ctx: &SourceContext) -> Result<Prediction, AppError> {
        let mut last_error = String::from("no sources configured");

        for source in &self.sources {
            tracing::debug!(source = source.name(), "trying prediction source");
            match source.resolve(ctx).await {
                Ok(prediction) => {
                    tracing::info!(
                        source = source.name(),
                        probability = prediction.probability,
                        "prediction resolved"
                    );
                    return Ok(prediction);
                }
                Err(e) => {
                    tracing::warn!(source = source.name(), "prediction source failed: {}", e);
                    last_error = format!("{}: {}", source.name(), e);
                }
            }
        }

        Err(AppError::Exhausted(last_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Confidence;

    fn request(lat: f64, lon: f64, date: &str) -> PredictionRequest {
        PredictionRequest {
            latitude: lat,
            longitude: lon,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    fn context(lat: f64, lon: f64, date: &str, today: &str) -> SourceContext {
        SourceContext {
            request: request(lat, lon, date),
            today: NaiveDate::parse_from_str(today, "%Y-%m-%d").unwrap(),
            current_weather: None,
        }
    }

    /// Source that always fails, for cascade-order tests
    struct FailingSource(&'static str);

    impl PredictionSource for FailingSource {
        fn name(&self) -> &'static str {
            self.0
        }

        fn resolve<'a>(&'a self, _ctx: &'a SourceContext) -> SourceFuture<'a> {
            Box::pin(async move {
                Err(SourceError::Unavailable("down for testing".to_string()))
            })
        }
    }

    fn shared_model() -> Arc<RwLock<RainModel>> {
        Arc::new(RwLock::new(RainModel::default()))
    }

    #[tokio::test]
    async fn test_cascade_falls_through_to_terminal_source() {
        let resolver = PredictionResolver::new(
            WeatherClient::new("unused".to_string()),
            vec![
                Box::new(FailingSource("first")),
                Box::new(FailingSource("second")),
                Box::new(FallbackSource::new(shared_model())),
            ],
        );

        let ctx = context(19.0760, 72.8777, "2026-07-15", "2026-06-01");
        let prediction = resolver.resolve_with_context(&ctx).await.unwrap();
        assert_eq!(prediction.source, vec!["climate_forecast".to_string()]);
    }

    #[tokio::test]
    async fn test_all_sources_failing_is_exhausted() {
        let resolver = PredictionResolver::new(
            WeatherClient::new("unused".to_string()),
            vec![
                Box::new(FailingSource("first")),
                Box::new(FailingSource("second")),
            ],
        );

        let ctx = context(0.0, 0.0, "2026-07-15", "2026-06-01");
        let result = resolver.resolve_with_context(&ctx).await;
        assert!(matches!(result, Err(AppError::Exhausted(_))));
    }

    #[tokio::test]
    async fn test_fallback_mumbai_monsoon_is_rain() {
        let source = FallbackSource::new(shared_model());
        let ctx = context(19.0760, 72.8777, "2026-07-15", "2026-06-01");
        let prediction = source.resolve(&ctx).await.unwrap();

        assert_eq!(prediction.verdict, Verdict::Rain);
        assert!(prediction.probability > 0.7);
        assert_eq!(prediction.source, vec!["climate_forecast".to_string()]);
    }

    #[tokio::test]
    async fn test_fallback_tags_past_dates_as_historical() {
        let source = FallbackSource::new(shared_model());
        let ctx = context(51.5074, -0.1278, "2024-03-01", "2026-06-01");
        let prediction = source.resolve(&ctx).await.unwrap();

        assert_eq!(prediction.source, vec!["historical_analysis".to_string()]);
        assert!(prediction.reasoning.contains("Historical"));
    }

    #[test]
    fn test_simple_prediction_monsoon_belt() {
        // Beyond the forecast horizon the estimate comes from season and belt
        let ctx = context(19.0760, 72.8777, "2026-08-20", "2026-06-01");
        let prediction = ForecastSource::simple_prediction(&ctx);

        // 0.4 seasonal + 0.1 tropical + 0.2 monsoon belt = 0.7
        assert!((prediction.probability - 0.7).abs() < 1e-9);
        assert_eq!(prediction.verdict, Verdict::Rain);
        assert_eq!(prediction.source, vec!["climate_forecast".to_string()]);
        assert!(prediction.reasoning.contains("80 days ahead"));
    }

    #[test]
    fn test_simple_prediction_winter_baseline() {
        let ctx = context(55.0, 10.0, "2027-01-10", "2026-06-01");
        let prediction = ForecastSource::simple_prediction(&ctx);
        assert!((prediction.probability - 0.25).abs() < 1e-9);
        assert_eq!(prediction.verdict, Verdict::Uncertain);
    }

    fn daily_forecast(pop: Option<f64>) -> DailyForecast {
        DailyForecast {
            dt: 1752537600,
            temp: None,
            humidity: None,
            wind_speed: None,
            pressure: None,
            clouds: None,
            pop,
            rain: None,
            snow: None,
            weather: Vec::new(),
        }
    }

    #[test]
    fn test_forecast_certain_rain_stays_in_band() {
        // A pop of 1.0 keeps the Rain/high verdict but the reported
        // probability is clamped like every other tier's
        let ctx = context(19.0760, 72.8777, "2025-07-15", "2025-07-14");
        let prediction = ForecastSource::from_forecast(&daily_forecast(Some(1.0)), Vec::new(), &ctx);

        assert_eq!(prediction.verdict, Verdict::Rain);
        assert_eq!(prediction.confidence, Confidence::High);
        assert!((prediction.probability - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_forecast_certain_dry_stays_in_band() {
        let ctx = context(25.0, 20.0, "2025-07-15", "2025-07-14");
        let prediction = ForecastSource::from_forecast(&daily_forecast(Some(0.0)), Vec::new(), &ctx);

        assert_eq!(prediction.verdict, Verdict::NoRain);
        assert_eq!(prediction.confidence, Confidence::High);
        assert!((prediction.probability - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_gemini_parse_fenced_completion() {
        let text = "```json\n{\"probability\": 0.75, \"verdict\": \"Rain\", \"confidence\": \"high\", \"reasoning\": \"monsoon\", \"temperature\": 28, \"humidity\": 85, \"conditions\": \"heavy rain\"}\n```";
        let forecast = GeminiSource::parse_completion(text).unwrap();
        assert_eq!(forecast.verdict, Verdict::Rain);
        assert_eq!(forecast.confidence, Confidence::High);
        assert_eq!(forecast.probability, 0.75);
    }

    #[test]
    fn test_gemini_verdict_is_trusted() {
        // Probability 0.3 would derive Uncertain, but the AI verdict wins
        let forecast = GeminiForecast {
            probability: 0.3,
            verdict: Verdict::Rain,
            confidence: Confidence::Low,
            reasoning: None,
            temperature: Some(22.0),
            humidity: Some(70.0),
            conditions: None,
        };
        let ctx = context(48.85, 2.35, "2026-09-01", "2026-06-01");
        let prediction = GeminiSource::to_prediction(forecast, &ctx);

        assert_eq!(prediction.verdict, Verdict::Rain);
        assert_eq!(prediction.confidence, Confidence::Low);
        assert_eq!(prediction.source, vec!["gemini_ai".to_string()]);
    }

    #[test]
    fn test_gemini_historical_source_tags() {
        let forecast = GeminiForecast {
            probability: 0.6,
            verdict: Verdict::Uncertain,
            confidence: Confidence::Medium,
            reasoning: Some("past data".to_string()),
            temperature: None,
            humidity: None,
            conditions: None,
        };
        let ctx = context(35.67, 139.65, "2023-04-01", "2026-06-01");
        let prediction = GeminiSource::to_prediction(forecast, &ctx);

        assert_eq!(
            prediction.source,
            vec!["historical_analysis".to_string(), "gemini_ai".to_string()]
        );
    }

    #[test]
    fn test_gemini_prompt_historical_framing() {
        let ctx = context(19.0760, 72.8777, "2023-07-15", "2026-06-01");
        let prompt = GeminiSource::build_prompt(&ctx);
        assert!(prompt.contains("historical analysis"));
        assert!(prompt.contains("(HISTORICAL DATE)"));
        assert!(prompt.contains("No current weather data available"));

        let ctx = context(19.0760, 72.8777, "2026-07-15", "2026-06-01");
        let prompt = GeminiSource::build_prompt(&ctx);
        assert!(prompt.contains("weather prediction"));
        assert!(prompt.contains("(FUTURE DATE)"));
    }

    #[test]
    fn test_ml_prediction_rederives_verdict() {
        let ml = MlPrediction {
            location: Some("Mumbai".to_string()),
            probability: 0.82,
            confidence: Some("low".to_string()),
            temperature: Some(28.0),
            humidity: Some(85.0),
            wind_speed: Some(14.4),
        };
        let ctx = context(19.0760, 72.8777, "2026-07-15", "2026-06-01");
        let prediction = MlSource::to_prediction(ml, &ctx);

        // Canonical thresholds override the script's own confidence
        assert_eq!(prediction.verdict, Verdict::Rain);
        assert_eq!(prediction.confidence, Confidence::High);
        assert_eq!(prediction.source, vec!["ml_model".to_string()]);
        // km/h converted to m/s
        assert!((prediction.details.daily.wind_speed - 4.0).abs() < 1e-9);
    }
}
