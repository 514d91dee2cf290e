//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Latitude-band climate classification driving the seasonal tables
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClimateZone {
    Equatorial,
    Tropical,
    Subtropical,
    Temperate,
    Polar,
}

impl ClimateZone {
    /// Classify a latitude into its climate zone by absolute value
    pub fn from_latitude(latitude: f64) -> Self {
        let abs_lat = latitude.abs();
        if abs_lat <= 10.0 {
            ClimateZone::Equatorial
        } else if abs_lat <= 23.5 {
            ClimateZone::Tropical
        } else if abs_lat <= 35.0 {
            ClimateZone::Subtropical
        } else if abs_lat <= 60.0 {
            ClimateZone::Temperate
        } else {
            ClimateZone::Polar
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClimateZone::Equatorial => "equatorial",
            ClimateZone::Tropical => "tropical",
            ClimateZone::Subtropical => "subtropical",
            ClimateZone::Temperate => "temperate",
            ClimateZone::Polar => "polar",
        }
    }
}

/// A resolved geocoding result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodedLocation {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
