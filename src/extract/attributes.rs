//! Quick-stat label table
//!
//! Product pages carry repeating `.quick_stat_entry` blocks, each holding a
//! label and a value. Labels are matched exactly (case-sensitive, after
//! trimming and dropping a trailing colon) against a fixed table of
//! accepted spellings. Unknown labels are ignored.

use crate::extract::water::parse_water_conditions;
use crate::extract::SpeciesRecord;

/// A structured attribute that a quick-stat block can populate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    CareLevel,
    Temperament,
    ColorForm,
    Diet,
    ReefCompatible,
    WaterConditions,
    MaxSize,
    Family,
    MinTankSize,
    ScientificName,
}

const LABELS: &[(&str, Attribute)] = &[
    ("Care Level", Attribute::CareLevel),
    ("Temperament", Attribute::Temperament),
    ("Color Form", Attribute::ColorForm),
    ("Color", Attribute::ColorForm),
    ("Diet", Attribute::Diet),
    ("Reef Compatible", Attribute::ReefCompatible),
    ("Water Conditions", Attribute::WaterConditions),
    ("Max. Size", Attribute::MaxSize),
    ("Maximum Size", Attribute::MaxSize),
    ("Family", Attribute::Family),
    ("Minimum Tank Size", Attribute::MinTankSize),
    ("Min. Tank Size", Attribute::MinTankSize),
    ("Scientific Name", Attribute::ScientificName),
];

impl Attribute {
    /// Looks up the attribute for a block label
    pub fn from_label(label: &str) -> Option<Self> {
        let label = normalize_label(label);
        LABELS
            .iter()
            .find(|(accepted, _)| *accepted == label)
            .map(|(_, attribute)| *attribute)
    }

    /// Stores a block value into the record field this attribute owns
    pub fn apply(self, record: &mut SpeciesRecord, value: &str) {
        let value = value.trim();
        match self {
            Self::CareLevel => record.care_level = value.to_string(),
            Self::Temperament => record.temperament = value.to_string(),
            Self::ColorForm => record.color_form = value.to_string(),
            Self::Diet => record.diet = value.to_string(),
            Self::ReefCompatible => record.reef_compatible = value.to_string(),
            Self::WaterConditions => record.water_params = parse_water_conditions(value),
            Self::MaxSize => record.max_size = value.to_string(),
            Self::Family => record.family = value.to_string(),
            Self::MinTankSize => record.min_tank_size = value.to_string(),
            Self::ScientificName => record.scientific_name = value.to_string(),
        }
    }
}

fn normalize_label(label: &str) -> &str {
    let label = label.trim();
    label.strip_suffix(':').unwrap_or(label).trim_end()
}

/// Applies one label/value block to a record
///
/// Returns whether the label was recognized.
pub fn apply_quick_stat(record: &mut SpeciesRecord, label: &str, value: &str) -> bool {
    match Attribute::from_label(label) {
        Some(attribute) => {
            attribute.apply(record, value);
            true
        }
        None => {
            tracing::trace!("Ignoring quick-stat label '{}'", label);
            false
        }
    }
}
