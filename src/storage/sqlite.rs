//! SQLite export of harvested collections
//!
//! Rows are only ever inserted: a species id already present in the
//! database is skipped so that edits made in the serving application are
//! not overwritten by a re-export.

use crate::extract::SpeciesRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::{StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Counts from one export pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub total: usize,
    pub inserted: usize,
    pub skipped: usize,
}

/// Writes species records into the serving database
pub struct SqliteExporter {
    conn: Connection,
}

impl SqliteExporter {
    /// Opens or creates the export database at `path`
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn contains(&self, id: &str) -> StorageResult<bool> {
        let found = self
            .conn
            .query_row("SELECT id FROM species WHERE id = ?1", params![id], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    pub fn count(&self) -> StorageResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM species", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Inserts every record whose id is not yet present
    ///
    /// `category` fills in records that lack their own category slug.
    /// The whole batch runs in one transaction.
    pub fn export(&mut self, records: &[SpeciesRecord], category: &str) -> StorageResult<ExportSummary> {
        let mut summary = ExportSummary::default();
        let tx = self.conn.transaction()?;

        for record in records {
            summary.total += 1;
            if record.id.is_empty() {
                summary.skipped += 1;
                continue;
            }

            let exists = tx
                .query_row(
                    "SELECT id FROM species WHERE id = ?1",
                    params![record.id],
                    |row| row.get::<_, String>(0),
                )
                .optional()?
                .is_some();
            if exists {
                summary.skipped += 1;
                continue;
            }

            let water_params = serde_json::to_string(&record.water_params).map_err(|source| {
                StorageError::Json {
                    path: "water_params".into(),
                    source,
                }
            })?;
            let record_category = if record.category.is_empty() {
                category
            } else {
                record.category.as_str()
            };

            tx.execute(
                "INSERT INTO species (
                    id, category, subcategory, name, name_tr, scientific_name, family,
                    care_level, care_level_tr, temperament, temperament_tr,
                    diet, diet_tr, max_size, min_tank_size,
                    reef_compatible, reef_compatible_tr, color_form,
                    water_params, description, description_tr, feeding, feeding_tr,
                    image_url, manually_edited_fields
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                          ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, '[]')",
                params![
                    record.id,
                    record_category,
                    non_empty(&record.subcategory),
                    non_empty(&record.name),
                    non_empty(&record.name_tr),
                    non_empty(&record.scientific_name),
                    non_empty(&record.family),
                    non_empty(&record.care_level),
                    non_empty(&record.care_level_tr),
                    non_empty(&record.temperament),
                    non_empty(&record.temperament_tr),
                    non_empty(&record.diet),
                    non_empty(&record.diet_tr),
                    non_empty(&record.max_size),
                    non_empty(&record.min_tank_size),
                    non_empty(&record.reef_compatible),
                    non_empty(&record.reef_compatible_tr),
                    non_empty(&record.color_form),
                    water_params,
                    non_empty(&record.description),
                    non_empty(&record.description_tr),
                    non_empty(&record.feeding),
                    non_empty(&record.feeding_tr),
                    non_empty(&record.image_url),
                ],
            )?;
            summary.inserted += 1;
        }

        tx.commit()?;
        Ok(summary)
    }
}

/// Empty strings are stored as NULL
fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
