//! Per-category harvest state: the persisted records and their known ids

use crate::config::CategoryConfig;
use crate::extract::SpeciesRecord;
use crate::storage::{read_collection, write_collection, StorageResult};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Accumulated records of one category and the ids they cover
///
/// The id set is derived from the record sequence on load and updated only
/// through [`CategoryState::append`], so the two never disagree.
#[derive(Debug, Clone)]
pub struct CategoryState {
    slug: String,
    path: PathBuf,
    records: Vec<SpeciesRecord>,
    known_ids: HashSet<String>,
}

impl CategoryState {
    /// Loads the persisted collection of `category` from `data_dir`
    ///
    /// A missing collection starts an empty state.
    pub fn load(data_dir: &Path, category: &CategoryConfig) -> StorageResult<Self> {
        let path = data_dir.join(category.collection_file());
        let records = read_collection(&path)?;
        Ok(Self::from_records(&category.slug, path, records))
    }

    /// Builds a state from records already in memory
    ///
    /// Records without an id, or repeating an earlier id, are dropped and
    /// disappear from the collection at the next [`CategoryState::persist`].
    pub fn from_records(slug: &str, path: PathBuf, records: Vec<SpeciesRecord>) -> Self {
        let mut state = Self {
            slug: slug.to_string(),
            path,
            records: Vec::with_capacity(records.len()),
            known_ids: HashSet::new(),
        };

        let total = records.len();
        for record in records {
            state.append(record);
        }
        if state.records.len() != total {
            tracing::warn!(
                "Dropped {} persisted {} records with a missing or repeated id; they will be removed on next save",
                total - state.records.len(),
                slug
            );
        }

        state
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.known_ids.contains(id)
    }

    pub fn records(&self) -> &[SpeciesRecord] {
        &self.records
    }

    /// Adds a record unless its id is empty or already known
    ///
    /// Returns whether the record was added. Known ids are never
    /// overwritten.
    pub fn append(&mut self, record: SpeciesRecord) -> bool {
        if record.id.is_empty() || self.known_ids.contains(&record.id) {
            return false;
        }

        self.known_ids.insert(record.id.clone());
        self.records.push(record);
        true
    }

    /// Writes the full record sequence as the category's collection
    pub fn persist(&self) -> StorageResult<()> {
        write_collection(&self.path, &self.records)?;
        tracing::info!("Saved {} {} records to {}", self.records.len(), self.slug, self.path.display());
        Ok(())
    }

    /// Distinct subcategory labels seen in the records, sorted
    pub fn subcategories(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .records
            .iter()
            .map(|record| record.subcategory.clone())
            .filter(|label| !label.is_empty())
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }
}
