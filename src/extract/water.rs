//! Parser for the free-text "Water Conditions" quick-stat value
//!
//! A typical value reads `72-78° F, dKH 8-12, pH 8.1-8.4, sg 1.020-1.025`.
//! Each sub-field is matched independently; a missing clause only leaves
//! its own field empty.

use crate::extract::WaterParams;
use once_cell::sync::Lazy;
use regex::Regex;

static TEMPERATURE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+[-–]\d+)\s*°?\s*F").expect("valid temperature range pattern"));

static TEMPERATURE_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*°\s*F").expect("valid temperature pattern"));

static SPECIFIC_GRAVITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(1\.\d+[-–]1\.\d+)").expect("valid specific gravity pattern"));

static PH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)pH\s*([\d.]+[-–][\d.]+)").expect("valid pH pattern"));

static DKH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)dKH\s*(\d+[-–]\d+)").expect("valid dKH pattern"));

/// Extracts temperature, specific gravity, pH and dKH from a value string
///
/// # Examples
///
/// ```
/// use aqua_harvest::extract::parse_water_conditions;
///
/// let params = parse_water_conditions("72-78°F, SG 1.020-1.025, pH 8.1-8.4, dKH 8-12");
/// assert_eq!(params.temperature, "72-78°F");
/// assert_eq!(params.sg, "1.020-1.025");
/// assert_eq!(params.ph, "8.1-8.4");
/// assert_eq!(params.dkh, "8-12");
/// ```
pub fn parse_water_conditions(text: &str) -> WaterParams {
    WaterParams {
        temperature: temperature(text).unwrap_or_default(),
        sg: first_group(&SPECIFIC_GRAVITY, text).unwrap_or_default(),
        ph: first_group(&PH, text).unwrap_or_default(),
        dkh: first_group(&DKH, text).unwrap_or_default(),
    }
}

fn temperature(text: &str) -> Option<String> {
    first_group(&TEMPERATURE_RANGE, text)
        .or_else(|| first_group(&TEMPERATURE_SINGLE, text))
        .map(|value| format!("{}°F", value))
}

fn first_group(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}
