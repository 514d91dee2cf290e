//! Canonical verdict derivation
//!
//! The single place a rain probability (and optional precipitation depth)
//! becomes a verdict and confidence. Every prediction tier routes through
//! this rule; the generative AI tier is the one exception, since it reasons
//! qualitatively and supplies its own verdict.

use shared::{Confidence, Verdict};

/// Map probability `p` and total precipitation depth `d` (mm) to a verdict.
///
/// Pure and deterministic: the same `(p, d)` always yields the same result.
pub fn derive_verdict(probability: f64, precipitation_mm: f64) -> (Verdict, Confidence) {
    if probability >= 0.7 || precipitation_mm > 2.0 {
        (Verdict::Rain, Confidence::High)
    } else if probability >= 0.4 || precipitation_mm > 0.5 {
        (Verdict::Rain, Confidence::Medium)
    } else if probability >= 0.2 || precipitation_mm > 0.1 {
        (Verdict::Uncertain, Confidence::Medium)
    } else if probability < 0.1 {
        (Verdict::NoRain, Confidence::High)
    } else {
        (Verdict::NoRain, Confidence::Medium)
    }
}

/// Human-readable explanation for a forecast-derived verdict
pub fn forecast_reasoning(verdict: Verdict, probability: f64, precipitation_mm: f64) -> String {
    let prob_pct = (probability * 100.0).round() as i64;

    match verdict {
        Verdict::Rain => {
            if precipitation_mm > 2.0 {
                format!(
                    "Weather forecast indicates significant rainfall ({:.1}mm) with {}% probability.",
                    precipitation_mm, prob_pct
                )
            } else {
                format!(
                    "Weather models show {}% likelihood of rain based on current conditions.",
                    prob_pct
                )
            }
        }
        Verdict::NoRain => format!(
            "Weather forecast shows clear conditions with only {}% precipitation probability.",
            prob_pct
        ),
        Verdict::Uncertain => format!(
            "Weather conditions show mixed patterns - {}% precipitation probability.",
            prob_pct
        ),
    }
}
