//! Validation utilities for the Will It Rain platform

use chrono::NaiveDate;

use crate::types::Coordinates;

/// Validate a latitude is in [-90, 90]
pub fn validate_latitude(latitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() {
        return Err("Latitude must be a finite number");
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    Ok(())
}

/// Validate a longitude is in [-180, 180]
pub fn validate_longitude(longitude: f64) -> Result<(), &'static str> {
    if !longitude.is_finite() {
        return Err("Longitude must be a finite number");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a coordinate pair
pub fn validate_coordinates(coords: &Coordinates) -> Result<(), &'static str> {
    validate_latitude(coords.latitude)?;
    validate_longitude(coords.longitude)?;
    Ok(())
}

/// Parse and validate a YYYY-MM-DD date string
pub fn parse_target_date(date: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| "Date must be in YYYY-MM-DD format")
}

/// Validate an Indian 6-digit postal pincode
pub fn is_indian_pincode(postal_code: &str) -> bool {
    postal_code.len() == 6 && postal_code.chars().all(|c| c.is_ascii_digit())
}
