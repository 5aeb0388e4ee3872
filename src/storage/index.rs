//! Category index artifact

use crate::config::CategoryConfig;
use crate::storage::{read_collection, write_json, StorageResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// One category's line in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIndexEntry {
    pub name: String,
    pub name_tr: String,
    pub slug: String,
    pub species_count: usize,
    /// Distinct subcategory labels, sorted
    pub subcategories: Vec<String>,
}

/// Builds the index from each category's persisted collection
///
/// Categories without a collection on disk, or with an unreadable one, are
/// listed with no species.
pub fn build_category_index(data_dir: &Path, categories: &[CategoryConfig]) -> Vec<CategoryIndexEntry> {
    categories
        .iter()
        .map(|category| {
            let path = data_dir.join(category.collection_file());
            let records = read_collection(&path).unwrap_or_else(|e| {
                tracing::warn!("Indexing {} with no species: {}", category.slug, e);
                Vec::new()
            });
            let subcategories: BTreeSet<String> = records
                .iter()
                .map(|record| record.subcategory.clone())
                .filter(|label| !label.is_empty())
                .collect();

            CategoryIndexEntry {
                name: category.name.clone(),
                name_tr: category.name_tr.clone(),
                slug: category.slug.clone(),
                species_count: records.len(),
                subcategories: subcategories.into_iter().collect(),
            }
        })
        .collect()
}

/// Builds the index and writes it to `index_path`
pub fn write_category_index(
    index_path: &Path,
    data_dir: &Path,
    categories: &[CategoryConfig],
) -> StorageResult<Vec<CategoryIndexEntry>> {
    let index = build_category_index(data_dir, categories);
    write_json(index_path, &index)?;
    tracing::info!("Wrote category index for {} categories", index.len());
    Ok(index)
}
