//! Sector recommendation models

use serde::{Deserialize, Serialize};

/// Operational sector a recommendation set targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    Agriculture,
    Logistics,
    Construction,
    Energy,
    Disaster,
    Tourism,
    Industrial,
    Water,
}

impl Sector {
    pub const ALL: [Sector; 8] = [
        Sector::Agriculture,
        Sector::Logistics,
        Sector::Construction,
        Sector::Energy,
        Sector::Disaster,
        Sector::Tourism,
        Sector::Industrial,
        Sector::Water,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sector::Agriculture => "agriculture",
            Sector::Logistics => "logistics",
            Sector::Construction => "construction",
            Sector::Energy => "energy",
            Sector::Disaster => "disaster",
            Sector::Tourism => "tourism",
            Sector::Industrial => "industrial",
            Sector::Water => "water",
        }
    }
}

/// Rain-intensity bucket derived from the prediction probability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RainLevel {
    Minimal,
    Light,
    Moderate,
    Heavy,
}

impl RainLevel {
    /// Bucket a probability into a rain level
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.7 {
            RainLevel::Heavy
        } else if probability > 0.4 {
            RainLevel::Moderate
        } else if probability > 0.1 {
            RainLevel::Light
        } else {
            RainLevel::Minimal
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RainLevel::Minimal => "minimal",
            RainLevel::Light => "light",
            RainLevel::Moderate => "moderate",
            RainLevel::Heavy => "heavy",
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            RainLevel::Minimal => "Minimal",
            RainLevel::Light => "Light",
            RainLevel::Moderate => "Moderate",
            RainLevel::Heavy => "Heavy",
        }
    }
}

/// Whether work can proceed in a sector under the predicted conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkStatus {
    pub can_work: bool,
    pub advice: String,
    pub weather_condition: String,
    pub rain_level: RainLevel,
    /// Rain probability as a whole percentage
    pub probability: u32,
}

/// How urgent an action item is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// When an action item should be carried out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Immediate,
    Today,
    ThisWeek,
}

/// A single prioritized action item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub timeframe: Timeframe,
}
