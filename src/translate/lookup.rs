//! Closed-vocabulary translations for categorical attributes
//!
//! Care level, temperament, diet and reef compatibility take a handful of
//! known values, so they are translated by table rather than by the
//! machine translator.

use crate::extract::SpeciesRecord;

/// A source → target value table
pub type LookupTable = &'static [(&'static str, &'static str)];

pub const CARE_LEVEL_TR: LookupTable = &[
    ("Easy", "Kolay"),
    ("Moderate", "Orta"),
    ("Difficult", "Zor"),
    ("Expert Only", "Sadece Uzman"),
    ("Expert", "Uzman"),
];

pub const TEMPERAMENT_TR: LookupTable = &[
    ("Peaceful", "Barışçıl"),
    ("Semi-aggressive", "Yarı Saldırgan"),
    ("Semi-Aggressive", "Yarı Saldırgan"),
    ("Aggressive", "Saldırgan"),
    ("Community Safe", "Topluluk Güvenli"),
];

pub const DIET_TR: LookupTable = &[
    ("Omnivore", "Hepçil"),
    ("Herbivore", "Otçul"),
    ("Carnivore", "Etçil"),
    ("Planktivore", "Planktoncu"),
    ("Filter Feeder", "Filtre Besleyici"),
    ("Photosynthetic", "Fotosentetik"),
];

pub const REEF_COMPAT_TR: LookupTable = &[
    ("Yes", "Evet"),
    ("No", "Hayır"),
    ("With Caution", "Dikkatli Olunmalı"),
    ("Monitor", "İzlenmeli"),
];

/// Translates one value: exact match, then case-insensitive, else unchanged
///
/// # Examples
///
/// ```
/// use aqua_harvest::translate::{translate_field, CARE_LEVEL_TR};
///
/// assert_eq!(translate_field("Easy", CARE_LEVEL_TR), "Kolay");
/// assert_eq!(translate_field("expert only", CARE_LEVEL_TR), "Sadece Uzman");
/// assert_eq!(translate_field("Varies", CARE_LEVEL_TR), "Varies");
/// ```
pub fn translate_field(value: &str, table: LookupTable) -> String {
    if value.is_empty() {
        return String::new();
    }
    let value = value.trim();

    if let Some((_, target)) = table.iter().find(|(source, _)| *source == value) {
        return target.to_string();
    }

    let lowered = value.to_lowercase();
    table
        .iter()
        .find(|(source, _)| source.to_lowercase() == lowered)
        .map(|(_, target)| target.to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Fills the four `*_tr` attribute fields of a record
pub fn translate_attributes(record: &mut SpeciesRecord) {
    record.care_level_tr = translate_field(&record.care_level, CARE_LEVEL_TR);
    record.temperament_tr = translate_field(&record.temperament, TEMPERAMENT_TR);
    record.diet_tr = translate_field(&record.diet, DIET_TR);
    record.reef_compatible_tr = translate_field(&record.reef_compatible, REEF_COMPAT_TR);
}
