//! Sector recommendation engine
//!
//! AI-first: a sector persona prompt plus the weather context goes to the
//! generative model, and its JSON action list is used when it parses. Any
//! failure falls back to the static sector policy tables, so the endpoint
//! always answers.

use chrono::{Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use shared::{Prediction, RainLevel, Recommendation, Sector, WorkStatus};

use crate::error::SourceError;
use crate::external::gemini::{extract_json_object, strip_code_fences, GeminiClient};
use crate::services::sector_actions;

/// Optional caller-supplied context forwarded into the prompt
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationContext {
    pub crop_type: Option<String>,
    pub cargo_type: Option<String>,
    pub work_type: Option<String>,
}

/// Ambient conditions echoed back with the recommendations
#[derive(Debug, Clone, Serialize)]
pub struct ContextualFactors {
    pub season: &'static str,
    pub time_of_day: &'static str,
    pub rain_level: RainLevel,
    pub location: String,
}

/// Prediction summary echoed back with the recommendations
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSummary {
    pub verdict: shared::Verdict,
    pub probability: f64,
    pub confidence: shared::Confidence,
}

/// Full recommendation payload for one sector and prediction
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub sector: Sector,
    pub location: String,
    pub date: String,
    pub work_status: WorkStatus,
    pub recommendations: Vec<Recommendation>,
    pub contextual_factors: ContextualFactors,
    pub generated_at: String,
    /// "ai" when the generative model answered, "sector_policy" otherwise
    pub source: &'static str,
    pub weather_data: WeatherSummary,
}

#[derive(Debug, Deserialize)]
struct AiRecommendationList {
    #[serde(default)]
    recommendations: Vec<Recommendation>,
}

fn sector_prompt(sector: Sector) -> &'static str {
    match sector {
        Sector::Agriculture => "As an expert agricultural advisor, analyze the weather conditions and provide 4 specific, actionable recommendations for farmers. Consider crop protection, irrigation, harvesting timing, field operations, and pest management.",
        Sector::Logistics => "As a senior logistics operations manager, provide 4 detailed recommendations for transportation and supply chain operations. Address route optimization, vehicle safety, cargo handling, delivery timing, and contingency planning.",
        Sector::Construction => "As a certified construction project manager, analyze weather impact and provide 4 comprehensive recommendations for construction activities. Focus on safety protocols, material handling, work scheduling, equipment protection, and project continuity.",
        Sector::Energy => "As an energy sector operations expert, provide 4 strategic recommendations for energy production and distribution. Address solar/wind generation, grid management, demand planning, infrastructure protection, and system reliability.",
        Sector::Disaster => "As an emergency management director, provide 4 critical recommendations for disaster preparedness and response. Focus on threat assessment, resource deployment, public warnings, evacuation planning, and inter-agency coordination.",
        Sector::Tourism => "As a tourism industry consultant, provide 4 practical recommendations for tourism businesses and visitor management. Address activity modifications, guest communication, safety protocols, indoor alternatives, and service continuity.",
        Sector::Industrial => "As an industrial operations director, provide 4 operational recommendations for manufacturing facilities. Focus on production scheduling, facility protection, worker safety, supply chain management, and operational efficiency.",
        Sector::Water => "As a water resource management expert, provide 4 strategic recommendations for water system operations. Address water level management, flood prevention, quality monitoring, infrastructure protection, and emergency response.",
    }
}

fn sector_advice(sector: Sector, level: RainLevel) -> String {
    match level {
        RainLevel::Minimal => format!("Excellent conditions for {} operations", sector.name()),
        RainLevel::Light => format!(
            "Good conditions with minor precautions for {}",
            sector.name()
        ),
        RainLevel::Moderate => format!("Challenging conditions - modify {} operations", sector.name()),
        RainLevel::Heavy => format!("Severe conditions - prioritize safety in {}", sector.name()),
    }
}

/// Whether a sector can operate under a rain level
fn can_work(sector: Sector, level: RainLevel) -> bool {
    use RainLevel::*;
    use Sector::*;
    match (sector, level) {
        (_, Minimal) | (_, Light) => true,
        (Logistics | Energy | Disaster | Industrial | Water, Moderate) => true,
        (Agriculture | Construction | Tourism, Moderate) => false,
        (Energy | Disaster | Water, Heavy) => true,
        (_, Heavy) => false,
    }
}

/// Work status summary for a sector under a prediction
pub fn work_status(sector: Sector, prediction: &Prediction) -> WorkStatus {
    let level = RainLevel::from_probability(prediction.probability);
    let probability = (prediction.probability * 100.0).round() as u32;

    WorkStatus {
        can_work: can_work(sector, level),
        advice: sector_advice(sector, level),
        weather_condition: format!(
            "{} rain expected ({}% chance)",
            level.display(),
            probability
        ),
        rain_level: level,
        probability,
    }
}

fn season_for_month(month: u32) -> &'static str {
    match month {
        3..=5 => "spring",
        6..=8 => "summer",
        9..=11 => "autumn",
        _ => "winter",
    }
}

fn time_of_day_category(hour: u32) -> &'static str {
    match hour {
        6..=11 => "morning",
        12..=17 => "afternoon",
        18..=21 => "evening",
        _ => "night",
    }
}

/// Generates recommendations via the AI-first strategy
#[derive(Clone)]
pub struct RecommendationEngine {
    gemini: GeminiClient,
}

impl RecommendationEngine {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    pub async fn recommend(
        &self,
        sector: Sector,
        prediction: &Prediction,
        location: &str,
        context: &RecommendationContext,
    ) -> RecommendationResponse {
        let level = RainLevel::from_probability(prediction.probability);
        let status = work_status(sector, prediction);

        let (recommendations, source) = match self.ai_recommendations(sector, prediction, location, context).await {
            Ok(items) if !items.is_empty() => (items, "ai"),
            Ok(_) => {
                tracing::warn!(sector = sector.name(), "AI returned an empty list, using sector policy");
                (sector_actions::actions(sector, level), "sector_policy")
            }
            Err(e) => {
                tracing::warn!(sector = sector.name(), "AI recommendations failed ({}), using sector policy", e);
                (sector_actions::actions(sector, level), "sector_policy")
            }
        };

        let now = Utc::now();

        RecommendationResponse {
            sector,
            location: location.to_string(),
            date: prediction.date.clone(),
            work_status: status,
            recommendations,
            contextual_factors: ContextualFactors {
                season: season_for_month(now.month()),
                time_of_day: time_of_day_category(now.hour()),
                rain_level: level,
                location: location.to_string(),
            },
            generated_at: now.to_rfc3339(),
            source,
            weather_data: WeatherSummary {
                verdict: prediction.verdict,
                probability: prediction.probability,
                confidence: prediction.confidence,
            },
        }
    }

    async fn ai_recommendations(
        &self,
        sector: Sector,
        prediction: &Prediction,
        location: &str,
        context: &RecommendationContext,
    ) -> Result<Vec<Recommendation>, SourceError> {
        let prompt = build_prompt(sector, prediction, location, context);
        let completion = self.gemini.generate(&prompt).await?;
        parse_ai_recommendations(&completion)
    }
}

fn build_prompt(
    sector: Sector,
    prediction: &Prediction,
    location: &str,
    context: &RecommendationContext,
) -> String {
    let mut weather_context = format!(
        "Weather Analysis for {} on {}:\n\
         - Rain Prediction: {} with {}% probability\n\
         - Confidence Level: {:?}\n\
         - Temperature: {}°C\n\
         - Humidity: {}%\n\
         - Wind Speed: {} m/s\n\
         - Weather Source: {}\n",
        location,
        prediction.date,
        prediction.verdict.weather_main(),
        (prediction.probability * 100.0).round(),
        prediction.confidence,
        prediction.details.daily.temp.day,
        prediction.details.daily.humidity,
        prediction.details.daily.wind_speed,
        prediction.source.join(", "),
    );

    if let Some(crop) = &context.crop_type {
        weather_context.push_str(&format!("- Crop Type: {}\n", crop));
    }
    if let Some(cargo) = &context.cargo_type {
        weather_context.push_str(&format!("- Cargo Type: {}\n", cargo));
    }
    if let Some(work) = &context.work_type {
        weather_context.push_str(&format!("- Work Type: {}\n", work));
    }

    format!(
        "{}\n\n{}\n\
         Based on this weather data, provide 4 specific, actionable recommendations. \
         Return ONLY a JSON object in this exact format:\n\
         {{\n\
           \"recommendations\": [\n\
             {{\n\
               \"title\": \"Brief actionable title\",\n\
               \"description\": \"Detailed practical recommendation with specific steps\",\n\
               \"priority\": \"high\",\n\
               \"timeframe\": \"immediate\"\n\
             }}\n\
           ]\n\
         }}",
        sector_prompt(sector),
        weather_context,
    )
}

fn parse_ai_recommendations(completion: &str) -> Result<Vec<Recommendation>, SourceError> {
    let cleaned = strip_code_fences(completion);
    let object = extract_json_object(&cleaned)
        .ok_or_else(|| SourceError::Malformed("no JSON object in completion".to_string()))?;
    let parsed: AiRecommendationList = serde_json::from_str(object)?;
    Ok(parsed.recommendations)
}
