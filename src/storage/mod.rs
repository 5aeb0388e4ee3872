//! Storage module for persisting harvested data
//!
//! This module handles every file the harvester writes:
//! - Per-category record collections (JSON snapshots, written atomically)
//! - The category index summarizing all collections
//! - The SQLite export consumed by the serving application

mod index;
mod schema;
mod sqlite;

pub use index::{build_category_index, write_category_index, CategoryIndexEntry};
pub use schema::{initialize_schema, SPECIES_SCHEMA_SQL};
pub use sqlite::{ExportSummary, SqliteExporter};

use crate::extract::SpeciesRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads a record collection
///
/// A missing file is an empty collection, not an error.
pub fn read_collection(path: &Path) -> StorageResult<Vec<SpeciesRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(io_error(path))?;
    serde_json::from_str(&content).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a complete record collection snapshot
pub fn write_collection(path: &Path, records: &[SpeciesRecord]) -> StorageResult<()> {
    write_json(path, &records)
}

/// Serializes `value` as 2-space pretty JSON and replaces `path` atomically
///
/// The content is written to a sibling temporary file first and renamed
/// over the target, so readers never observe a half-written file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    let content = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    std::fs::write(&tmp_path, content).map_err(io_error(&tmp_path))?;
    std::fs::rename(&tmp_path, path).map_err(io_error(path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::WaterParams;

    fn record(id: &str, name: &str) -> SpeciesRecord {
        SpeciesRecord {
            id: id.to_string(),
            url: format!("https://www.liveaquaria.com/product/{}/x", id),
            name: name.to_string(),
            name_tr: name.to_string(),
            category: "corals".to_string(),
            care_level: "Easy".to_string(),
            care_level_tr: "Kolay".to_string(),
            water_params: WaterParams {
                temperature: "72-78°F".to_string(),
                ..WaterParams::default()
            },
            description_tr: "Barışçıl mercan".to_string(),
            ..SpeciesRecord::default()
        }
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let records = read_collection(&dir.path().join("corals.json")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_collection_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("corals.json");
        let records = vec![record("1", "Frogspawn Coral"), record("2", "Zoanthid")];

        write_collection(&path, &records).unwrap();
        let first = std::fs::read(&path).unwrap();
        let loaded = read_collection(&path).unwrap();
        assert_eq!(loaded, records);

        write_collection(&path, &loaded).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), first);
        assert!(!dir.path().join("nested").join("corals.json.tmp").exists());
    }

    #[test]
    fn test_output_is_pretty_and_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corals.json");
        write_collection(&path, &[record("1", "Frogspawn Coral")]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n    \"id\": \"1\""));
        assert!(content.contains("Barışçıl"));
    }

    #[test]
    fn test_corrupt_collection_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corals.json");
        std::fs::write(&path, "[{not json").unwrap();

        assert!(matches!(read_collection(&path), Err(StorageError::Json { .. })));
    }
}
