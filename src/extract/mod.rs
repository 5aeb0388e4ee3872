//! Product extraction module
//!
//! This module turns one product page into one [`SpeciesRecord`]:
//! - Record schema and validity rules
//! - The quick-stat attribute table
//! - The water-conditions sub-parser
//! - Field-by-field extraction with layout fallbacks

mod attributes;
mod product;
mod text;
mod water;

pub use attributes::{apply_quick_stat, Attribute};
pub use product::{parse_species_page, PageContext, ProductExtractor};
pub use text::{char_len, element_text, truncate_chars};
pub use water::parse_water_conditions;

use serde::{Deserialize, Serialize};

/// Water chemistry ranges, kept in the catalog's own notation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterParams {
    pub temperature: String,
    pub sg: String,
    pub ph: String,
    pub dkh: String,
}

impl WaterParams {
    /// True when no sub-field was extracted
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty() && self.sg.is_empty() && self.ph.is_empty() && self.dkh.is_empty()
    }
}

/// One species care-sheet
///
/// Field order is the on-disk order of the persisted collections. Every
/// field except `id` and `name` is optional and stored as an empty string
/// when the page does not provide it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesRecord {
    pub id: String,
    pub url: String,
    pub name: String,
    pub name_tr: String,
    pub scientific_name: String,
    pub family: String,
    pub category: String,
    pub subcategory: String,
    pub care_level: String,
    pub care_level_tr: String,
    pub temperament: String,
    pub temperament_tr: String,
    pub diet: String,
    pub diet_tr: String,
    pub max_size: String,
    pub min_tank_size: String,
    pub reef_compatible: String,
    pub reef_compatible_tr: String,
    pub color_form: String,
    pub water_params: WaterParams,
    pub description: String,
    pub description_tr: String,
    pub feeding: String,
    pub feeding_tr: String,
    pub image_url: String,
}

impl SpeciesRecord {
    /// A record is accepted into a collection only with an id and a name
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && !self.name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_requires_id_and_name() {
        let mut record = SpeciesRecord::default();
        assert!(!record.is_valid());

        record.id = "1203".to_string();
        assert!(!record.is_valid());

        record.name = "Clarkii Clownfish".to_string();
        assert!(record.is_valid());

        record.id = "  ".to_string();
        assert!(!record.is_valid());
    }

    #[test]
    fn test_serialized_field_order() {
        let record = SpeciesRecord {
            id: "1".to_string(),
            name: "Yellow Tang".to_string(),
            ..SpeciesRecord::default()
        };
        let json = serde_json::to_string(&record).unwrap();

        let id = json.find("\"id\"").unwrap();
        let name_tr = json.find("\"name_tr\"").unwrap();
        let color_form = json.find("\"color_form\"").unwrap();
        let water = json.find("\"water_params\"").unwrap();
        let image = json.find("\"image_url\"").unwrap();
        assert!(id < name_tr && name_tr < color_form && color_form < water && water < image);
    }

    #[test]
    fn test_missing_fields_deserialize_empty() {
        let record: SpeciesRecord =
            serde_json::from_str(r#"{"id": "7", "name": "Firefish", "water_params": {"ph": "8.1-8.4"}}"#)
                .unwrap();

        assert_eq!(record.id, "7");
        assert_eq!(record.color_form, "");
        assert_eq!(record.water_params.ph, "8.1-8.4");
        assert_eq!(record.water_params.temperature, "");
    }
}
