//! Imperial to metric conversion of measurement fields
//!
//! Rewrites `max_size` (inches → cm), `min_tank_size` (gallons → L) and
//! the water temperature (°F → °C), using a decimal comma. Values already in
//! metric units pass through, so running the conversion twice is harmless.

use crate::extract::SpeciesRecord;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const CM_PER_INCH: f64 = 2.54;
const LITRES_PER_GALLON: f64 = 3.785;

const FRACTIONS: &[(char, f64)] = &[
    ('½', 0.5),
    ('¼', 0.25),
    ('¾', 0.75),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('⅛', 0.125),
];

static CELSIUS_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)\.(\d)").expect("valid decimal pattern"));

static FAHRENHEIT_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*[-–]\s*(\d+)\s*°?\s*F").expect("valid range pattern"));

static FAHRENHEIT_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*°?\s*F").expect("valid temperature pattern"));

static FEET_AND_INCHES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(\d+)'\s*([\d.]+)?"?"#).expect("valid feet pattern"));

static INCH_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([\d.]+)\s*[-–]\s*([\d.]+)\s*(?:"|inches?|in\b)"#).expect("valid inch range pattern")
});

static INCH_UPPER_BOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:up\s*to|max\.?)\s*([\d.]+)\s*(?:"|inches?|in\b)"#).expect("valid upper bound pattern")
});

static INCH_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)([\d.]+)\s*(?:"|inches?|in\b)"#).expect("valid inch pattern"));

static GALLONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([\d,]+)\+?\s*gallons?").expect("valid gallon pattern"));

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `22.0` → `22`, `22.2` → `22,2`
fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string().replace('.', ",")
    }
}

fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    round1((fahrenheit - 32.0) * 5.0 / 9.0)
}

fn inches_to_cm(inches: f64) -> f64 {
    round1(inches * CM_PER_INCH)
}

/// Litres rounded to the nearest 5 from 10 L upwards
fn gallons_to_litres(gallons: f64) -> String {
    let litres = gallons * LITRES_PER_GALLON;
    if litres >= 10.0 {
        format!("{}", ((litres / 5.0).round() * 5.0) as i64)
    } else {
        format_decimal(round1(litres))
    }
}

/// `72-78°F` → `22,2-25,6°C`; Celsius values only get a decimal comma
pub fn convert_temperature(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    if value.contains("°C") {
        return CELSIUS_DECIMAL.replace_all(value, "$1,$2").into_owned();
    }

    if let Some(caps) = FAHRENHEIT_RANGE.captures(value) {
        if let (Ok(low), Ok(high)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
            return format!(
                "{}-{}°C",
                format_decimal(fahrenheit_to_celsius(low)),
                format_decimal(fahrenheit_to_celsius(high))
            );
        }
    }

    if let Some(caps) = FAHRENHEIT_SINGLE.captures(value) {
        if let Ok(single) = caps[1].parse::<f64>() {
            return format!("{}°C", format_decimal(fahrenheit_to_celsius(single)));
        }
    }

    value.to_string()
}

/// Rewrites fraction characters and feet marks as plain inch values
fn normalize_size(value: &str) -> String {
    let mut normalized = value.to_string();

    for (fraction, amount) in FRACTIONS {
        let attached = Regex::new(&format!(r"(\d)\s*{}", fraction));
        if let Ok(attached) = attached {
            normalized = attached
                .replace_all(&normalized, |caps: &Captures| {
                    let digit: f64 = caps[1].parse().unwrap_or_default();
                    (digit + amount).to_string()
                })
                .into_owned();
        }
        normalized = normalized.replace(*fraction, &amount.to_string());
    }

    FEET_AND_INCHES
        .replace_all(&normalized, |caps: &Captures| {
            let feet: f64 = caps[1].parse().unwrap_or_default();
            let inches: f64 = caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or_default();
            format!("{}\"", feet * 12.0 + inches)
        })
        .into_owned()
}

/// `6-8"` → `15,2-20,3 cm`, `Up to 12"` → `Maks. 30,5 cm`
pub fn convert_max_size(value: &str) -> String {
    if value.is_empty() || value.to_lowercase().contains("cm") {
        return value.to_string();
    }

    let normalized = normalize_size(value.trim());

    if let Some(caps) = INCH_RANGE.captures(&normalized) {
        if let (Ok(low), Ok(high)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
            return format!(
                "{}-{} cm",
                format_decimal(inches_to_cm(low)),
                format_decimal(inches_to_cm(high))
            );
        }
    }

    if let Some(caps) = INCH_UPPER_BOUND.captures(&normalized) {
        if let Ok(max) = caps[1].parse::<f64>() {
            return format!("Maks. {} cm", format_decimal(inches_to_cm(max)));
        }
    }

    if let Some(caps) = INCH_SINGLE.captures(&normalized) {
        if let Ok(single) = caps[1].parse::<f64>() {
            return format!("{} cm", format_decimal(inches_to_cm(single)));
        }
    }

    value.to_string()
}

/// `30 gallons` → `115 L`, `125+ gallons` → `475+ L`
pub fn convert_tank_size(value: &str) -> String {
    if value.is_empty() || value.contains(" L") || value.to_lowercase().contains("litre") {
        return value.to_string();
    }

    let trimmed = value.trim();
    if let Some(caps) = GALLONS.captures(trimmed) {
        if let Ok(gallons) = caps[1].replace(',', "").parse::<f64>() {
            let plus = if trimmed.contains('+') { "+" } else { "" };
            return format!("{}{} L", gallons_to_litres(gallons), plus);
        }
    }

    value.to_string()
}

/// Converts the measurement fields of one record in place
///
/// Returns whether anything changed.
pub fn convert_record(record: &mut SpeciesRecord) -> bool {
    let max_size = convert_max_size(&record.max_size);
    let min_tank_size = convert_tank_size(&record.min_tank_size);
    let temperature = convert_temperature(&record.water_params.temperature);

    let changed = max_size != record.max_size
        || min_tank_size != record.min_tank_size
        || temperature != record.water_params.temperature;

    record.max_size = max_size;
    record.min_tank_size = min_tank_size;
    record.water_params.temperature = temperature;
    changed
}
