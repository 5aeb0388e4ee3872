//! Database schema for the SQLite export
//!
//! The table layout is the one the serving application reads: one row per
//! species, water parameters stored as a JSON object in a text column.

/// SQL schema for the export database
pub const SPECIES_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS species (
    id TEXT PRIMARY KEY,
    category TEXT NOT NULL,
    subcategory TEXT,
    name TEXT,
    name_tr TEXT,
    scientific_name TEXT,
    family TEXT,
    care_level TEXT,
    care_level_tr TEXT,
    temperament TEXT,
    temperament_tr TEXT,
    diet TEXT,
    diet_tr TEXT,
    max_size TEXT,
    min_tank_size TEXT,
    reef_compatible TEXT,
    reef_compatible_tr TEXT,
    color_form TEXT,
    water_params TEXT,
    description TEXT,
    description_tr TEXT,
    feeding TEXT,
    feeding_tr TEXT,
    image_url TEXT,
    manually_edited_fields TEXT DEFAULT '[]',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_species_category ON species(category);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SPECIES_SCHEMA_SQL)?;
    Ok(())
}
