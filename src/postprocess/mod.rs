//! Stages that run over an already harvested dataset
//!
//! Each stage reads the persisted category collections, rewrites them in
//! place where needed, and can be rerun safely:
//! - Unit conversion of measurement fields
//! - Removal of shop boilerplate from descriptions
//! - Image download and local image URLs
//! - Publishing the dataset to the site directory

mod cleaner;
mod images;
mod publish;
mod units;

pub use cleaner::{clean_english, clean_record, clean_turkish};
pub use images::{
    image_extension, retrieve_images, ImageError, ImageRetriever, ImageStats, LOCAL_IMAGE_PREFIX,
};
pub use publish::{publish, PublishSummary};
pub use units::{convert_max_size, convert_record, convert_tank_size, convert_temperature};

use crate::config::Config;
use crate::extract::SpeciesRecord;
use crate::storage::{read_collection, write_collection, StorageResult};

/// Applies `rewrite` to every record of every category collection
///
/// Collections are only written back when a record changed. Returns the
/// number of changed records.
pub fn rewrite_collections<F>(config: &Config, mut rewrite: F) -> StorageResult<usize>
where
    F: FnMut(&mut SpeciesRecord) -> bool,
{
    let mut total = 0;

    for category in &config.categories {
        let path = config.output.data_dir().join(category.collection_file());
        if !path.exists() {
            tracing::warn!("{} not found, skipping", path.display());
            continue;
        }

        let mut records = read_collection(&path)?;
        let changed = records.iter_mut().map(&mut rewrite).filter(|c| *c).count();
        if changed > 0 {
            write_collection(&path, &records)?;
        }

        tracing::info!(
            "{}: {} of {} records updated",
            category.slug,
            changed,
            records.len()
        );
        total += changed;
    }

    Ok(total)
}

/// Converts imperial measurements in every collection
pub fn convert_units(config: &Config) -> StorageResult<usize> {
    rewrite_collections(config, convert_record)
}

/// Strips boilerplate from every collection's descriptions
pub fn clean_descriptions(config: &Config) -> StorageResult<usize> {
    rewrite_collections(config, clean_record)
}
