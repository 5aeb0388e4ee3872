//! Copies the harvested dataset into the site's public directory

use crate::config::Config;
use crate::storage::{StorageError, StorageResult};
use std::path::Path;

/// Files copied by a publish pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub collections: usize,
    pub images_copied: usize,
    pub images_unchanged: usize,
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Whether `dest` is missing or older than `src`
fn needs_copy(src: &Path, dest: &Path) -> bool {
    let modified = |p: &Path| std::fs::metadata(p).and_then(|m| m.modified());
    match (modified(src), modified(dest)) {
        (Ok(src_time), Ok(dest_time)) => src_time > dest_time,
        _ => true,
    }
}

/// Copies `src` over `dest` when the destination is stale
///
/// Returns whether a copy happened.
fn sync_file(src: &Path, dest: &Path) -> StorageResult<bool> {
    if !needs_copy(src, dest) {
        return Ok(false);
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    std::fs::copy(src, dest).map_err(|e| io_error(dest, e))?;
    Ok(true)
}

/// Publishes collections, the category index and images under `publish-dir`
///
/// # Layout
///
/// - `<publish-dir>/data/<slug>.json` and the index file
/// - `<publish-dir>/images/<slug>/<file>`
pub fn publish(config: &Config) -> StorageResult<PublishSummary> {
    let publish_dir = Path::new(&config.postprocess.publish_dir);
    let data_dir = config.output.data_dir();
    let image_dir = Path::new(&config.postprocess.image_dir);
    let mut summary = PublishSummary::default();

    let mut data_files: Vec<String> = config
        .categories
        .iter()
        .map(|c| c.collection_file())
        .collect();
    data_files.push(config.output.index_file.clone());

    for file in &data_files {
        let src = data_dir.join(file);
        if !src.is_file() {
            tracing::warn!("{} not found, not published", src.display());
            continue;
        }
        if sync_file(&src, &publish_dir.join("data").join(file))? {
            summary.collections += 1;
        }
    }

    for category in &config.categories {
        let src_dir = image_dir.join(&category.slug);
        if !src_dir.is_dir() {
            continue;
        }

        let dest_dir = publish_dir.join("images").join(&category.slug);
        let entries = std::fs::read_dir(&src_dir).map_err(|e| io_error(&src_dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| io_error(&src_dir, e))?;
            let src = entry.path();
            if !src.is_file() {
                continue;
            }

            if sync_file(&src, &dest_dir.join(entry.file_name()))? {
                summary.images_copied += 1;
            } else {
                summary.images_unchanged += 1;
            }
        }
    }

    tracing::info!(
        "Published {} data files and {} images ({} unchanged) to {}",
        summary.collections,
        summary.images_copied,
        summary.images_unchanged,
        publish_dir.display()
    );
    Ok(summary)
}
