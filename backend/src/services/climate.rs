//! Climate heuristic model
//!
//! Pure baseline predictor mapping (latitude, longitude, month) to a rain
//! probability and temperature from zone tables compiled from NOAA and World
//! Bank climate data, adjusted by regional modifiers and deterministic
//! variation terms. Cannot fail; the only randomness is an explicit
//! temperature jitter drawn from the injected rng.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use shared::{ClimateZone, Confidence};

/// Source tag reported by this model
pub const SOURCE_TAG: &str = "historical-patterns";

/// Monthly rain probability per climate zone (January..December)
const MONTHLY_RAIN: [(ClimateZone, [f64; 12]); 5] = [
    (
        ClimateZone::Equatorial,
        [0.75, 0.70, 0.80, 0.85, 0.80, 0.65, 0.60, 0.65, 0.75, 0.85, 0.85, 0.80],
    ),
    (
        ClimateZone::Tropical,
        [0.25, 0.20, 0.35, 0.45, 0.60, 0.75, 0.80, 0.75, 0.65, 0.50, 0.35, 0.30],
    ),
    (
        ClimateZone::Subtropical,
        [0.15, 0.12, 0.20, 0.25, 0.18, 0.08, 0.05, 0.08, 0.15, 0.22, 0.25, 0.18],
    ),
    (
        ClimateZone::Temperate,
        [0.25, 0.22, 0.30, 0.35, 0.40, 0.45, 0.50, 0.45, 0.35, 0.30, 0.28, 0.25],
    ),
    (
        ClimateZone::Polar,
        [0.25, 0.20, 0.25, 0.30, 0.35, 0.45, 0.50, 0.45, 0.35, 0.30, 0.25, 0.25],
    ),
];

/// Monthly average temperature per climate zone, in Celsius
const MONTHLY_TEMP: [(ClimateZone, [f64; 12]); 5] = [
    (
        ClimateZone::Equatorial,
        [26.0, 27.0, 28.0, 28.0, 27.0, 26.0, 25.0, 25.0, 26.0, 27.0, 27.0, 26.0],
    ),
    (
        ClimateZone::Tropical,
        [24.0, 25.0, 27.0, 29.0, 31.0, 32.0, 32.0, 31.0, 30.0, 28.0, 26.0, 24.0],
    ),
    (
        ClimateZone::Subtropical,
        [18.0, 20.0, 23.0, 26.0, 30.0, 33.0, 35.0, 34.0, 31.0, 27.0, 22.0, 19.0],
    ),
    (
        ClimateZone::Temperate,
        [5.0, 7.0, 12.0, 17.0, 22.0, 26.0, 28.0, 27.0, 23.0, 17.0, 11.0, 6.0],
    ),
    (
        ClimateZone::Polar,
        [-15.0, -12.0, -8.0, -2.0, 4.0, 10.0, 12.0, 10.0, 5.0, -1.0, -7.0, -12.0],
    ),
];

/// Monsoon wet/dry season swing, keyed by month (1-12)
const MONSOON_MODIFIERS: [f64; 12] = [
    0.15, 0.18, 0.25, 0.8, 1.5, 3.5, 4.0, 3.8, 2.8, 1.0, 1.0, 0.2,
];

/// Mediterranean wet-winter/dry-summer swing, keyed by month (1-12)
const MEDITERRANEAN_MODIFIERS: [f64; 12] = [
    1.4, 1.3, 1.2, 0.8, 0.5, 0.2, 0.1, 0.1, 0.4, 1.0, 1.0, 1.5,
];

/// Flat multiplier for the desert bounding boxes
pub const DESERT_MODIFIER: f64 = 0.15;

/// Named desert bounding boxes: (lat range, lon range)
const DESERT_REGIONS: [((f64, f64), (f64, f64)); 3] = [
    ((20.0, 35.0), (-120.0, -100.0)), // SW USA
    ((15.0, 35.0), (10.0, 50.0)),     // Sahara / Middle East
    ((-35.0, -15.0), (110.0, 140.0)), // Australian desert
];

/// Whether a coordinate falls in the monsoon band
pub fn in_monsoon_band(lat: f64, lon: f64) -> bool {
    (5.0..=30.0).contains(&lat) && (60.0..=140.0).contains(&lon)
}

/// Whether a coordinate falls in the Mediterranean band
pub fn in_mediterranean_band(lat: f64, lon: f64) -> bool {
    (30.0..=45.0).contains(&lat) && (-10.0..=45.0).contains(&lon)
}

/// Whether a coordinate falls in one of the named desert boxes
pub fn in_desert_region(lat: f64, lon: f64) -> bool {
    DESERT_REGIONS.iter().any(|((lat_lo, lat_hi), (lon_lo, lon_hi))| {
        (*lat_lo..=*lat_hi).contains(&lat) && (*lon_lo..=*lon_hi).contains(&lon)
    })
}

fn zone_row<const N: usize>(table: &[(ClimateZone, [f64; N]); 5], zone: ClimateZone) -> &[f64; N] {
    // The tables are exhaustive over ClimateZone by construction
    table
        .iter()
        .find(|(z, _)| *z == zone)
        .map(|(_, row)| row)
        .unwrap_or(&table[0].1)
}

/// Baseline monthly rain probability for a zone, before any modifiers
pub fn monthly_baseline(zone: ClimateZone, month: u32) -> f64 {
    zone_row(&MONTHLY_RAIN, zone)[(month as usize - 1).min(11)]
}

/// Zone temperature for a month, shifted six months for the southern
/// hemisphere so seasons invert
pub fn monthly_temperature(zone: ClimateZone, month: u32, latitude: f64) -> f64 {
    let row = zone_row(&MONTHLY_TEMP, zone);
    let index = if latitude < 0.0 {
        ((month as usize) + 5) % 12
    } else {
        month as usize - 1
    };
    row[index.min(11)]
}

/// Composite regional modifier for a coordinate and month.
///
/// Overlapping bands compose multiplicatively; ordering is immaterial since
/// multiplication commutes.
pub fn regional_modifier(lat: f64, lon: f64, month: u32) -> f64 {
    let idx = (month as usize - 1).min(11);
    let mut modifier = 1.0;

    if in_monsoon_band(lat, lon) {
        modifier *= MONSOON_MODIFIERS[idx];
    }
    if in_mediterranean_band(lat, lon) {
        modifier *= MEDITERRANEAN_MODIFIERS[idx];
    }
    if in_desert_region(lat, lon) {
        modifier *= DESERT_MODIFIER;
    }

    modifier
}

/// Output of the climate heuristic model
#[derive(Debug, Clone)]
pub struct ClimateEstimate {
    /// Rain probability, always within [0.05, 0.85]
    pub rain_probability: f64,
    /// Average temperature in Celsius, including jitter
    pub avg_temp: f64,
    pub confidence: Confidence,
    pub source: &'static str,
}

/// Predict baseline rain probability and temperature for a location and date.
///
/// Deterministic given its inputs apart from the ±3°C temperature jitter
/// drawn from `rng`.
pub fn predict<R: Rng>(lat: f64, lon: f64, date: NaiveDate, rng: &mut R) -> ClimateEstimate {
    let month = date.month();
    let zone = ClimateZone::from_latitude(lat);

    let mut probability = monthly_baseline(zone, month);
    probability *= regional_modifier(lat, lon, month);

    // Deterministic variation terms
    let day_of_year = date.ordinal() as f64;
    let seasonal_variation = (day_of_year * 2.0 * std::f64::consts::PI / 365.0).sin() * 0.1;

    let location_seed = ((lat * 0.1).sin() * (lon * 0.1).cos()).abs();
    let location_variation = location_seed * 0.3 - 0.15;

    // Coastal areas slightly wetter
    let coastal_effect = if (lon % 30.0).abs() < 15.0 { 0.05 } else { -0.02 };
    // Higher latitudes slightly wetter
    let altitude_effect = if lat.abs() > 45.0 { 0.03 } else { 0.0 };

    probability += seasonal_variation + location_variation + coastal_effect + altitude_effect;
    probability = probability.clamp(0.05, 0.85);

    let avg_temp = monthly_temperature(zone, month, lat) + (rng.gen::<f64>() - 0.5) * 6.0;

    let confidence = if probability > 0.6 || probability < 0.25 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    ClimateEstimate {
        rain_probability: probability,
        avg_temp,
        confidence,
        source: SOURCE_TAG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monsoon_boost_in_july() {
        // Mumbai sits in the monsoon band
        assert!(in_monsoon_band(19.0760, 72.8777));
        assert_eq!(regional_modifier(19.0760, 72.8777, 7), 4.0);
        assert_eq!(regional_modifier(19.0760, 72.8777, 1), 0.15);
    }

    #[test]
    fn test_desert_modifier_exact() {
        // Sahara coordinate in a month with no overlapping monsoon band
        let lat = 25.0;
        let lon = 15.0;
        assert!(in_desert_region(lat, lon));
        assert!(!in_monsoon_band(lat, lon));
        assert!(!in_mediterranean_band(lat, lon));
        assert_eq!(regional_modifier(lat, lon, 10), DESERT_MODIFIER);
    }

    #[test]
    fn test_overlapping_modifiers_compose_multiplicatively() {
        // Arabian desert inside both the monsoon band and a desert box
        let lat = 22.0;
        let lon = 45.0;
        assert!(in_monsoon_band(lat, lon));
        assert!(in_desert_region(lat, lon));
        let expected = MONSOON_MODIFIERS[6] * DESERT_MODIFIER;
        assert!((regional_modifier(lat, lon, 7) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_southern_hemisphere_month_shift() {
        // Sydney-like latitude in January must use the shifted index
        // (month + 5) % 12 = 6, a winter row for the north but summer south
        let north = monthly_temperature(ClimateZone::Subtropical, 1, 33.87);
        let south = monthly_temperature(ClimateZone::Subtropical, 1, -33.87);
        assert_eq!(north, 18.0); // January row
        assert_eq!(south, 35.0); // July row
        assert!(south > north);
    }

    #[test]
    fn test_mumbai_july_predicts_rain() {
        let mut rng = StdRng::seed_from_u64(7);
        let estimate = predict(19.0760, 72.8777, date(2025, 7, 15), &mut rng);
        // Monsoon multiplier pushes the clamped probability to the ceiling
        assert!(estimate.rain_probability > 0.7);
        assert_eq!(estimate.confidence, Confidence::Medium);
        assert_eq!(estimate.source, SOURCE_TAG);
    }

    #[test]
    fn test_probability_jitter_free() {
        // Identical inputs give identical probabilities across rng seeds;
        // the jitter only touches temperature
        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(2);
        let a = predict(48.85, 2.35, date(2025, 4, 10), &mut rng_a);
        let b = predict(48.85, 2.35, date(2025, 4, 10), &mut rng_b);
        assert_eq!(a.rain_probability, b.rain_probability);
    }

    proptest! {
        #[test]
        fn prop_probability_in_band(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let mut rng = StdRng::seed_from_u64(42);
            let estimate = predict(lat, lon, date(2025, month, day), &mut rng);
            prop_assert!((0.05..=0.85).contains(&estimate.rain_probability));
        }
    }
}
