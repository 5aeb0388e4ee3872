//! Run statistics
//!
//! Counters collected by the coordinator while it walks the catalog, and a
//! console rendering of them. The `--stats` mode prints the persisted
//! dataset instead, from the category index.

use crate::storage::CategoryIndexEntry;
use crate::translate::TranslationStats;
use chrono::{DateTime, Utc};

/// How a harvest run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Interrupted,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
        }
    }
}

/// Counters for one category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStatistics {
    pub slug: String,
    pub name: String,
    /// Records already persisted before this run
    pub records_before: usize,
    pub subcategories_visited: usize,
    /// Product URLs found on listing pages
    pub urls_listed: usize,
    /// Listed URLs whose id was not yet known
    pub new_urls: usize,
    pub records_added: usize,
    pub fetch_failures: usize,
    /// Pages that produced no id or no name
    pub invalid_records: usize,
    /// Set when discovery found nothing and the category was walked whole
    pub used_fallback: bool,
}

impl CategoryStatistics {
    pub fn new(slug: &str, name: &str, records_before: usize) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            records_before,
            ..Self::default()
        }
    }

    pub fn records_after(&self) -> usize {
        self.records_before + self.records_added
    }
}

/// Counters for a whole run
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub config_hash: String,
    pub status: RunStatus,
    pub categories: Vec<CategoryStatistics>,
    pub translation: TranslationStats,
}

impl RunStatistics {
    pub fn start(config_hash: &str) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            config_hash: config_hash.to_string(),
            status: RunStatus::Running,
            categories: Vec::new(),
            translation: TranslationStats::default(),
        }
    }

    pub fn finish(&mut self, status: RunStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn records_added(&self) -> usize {
        self.categories.iter().map(|c| c.records_added).sum()
    }

    pub fn fetch_failures(&self) -> usize {
        self.categories.iter().map(|c| c.fetch_failures).sum()
    }

    pub fn invalid_records(&self) -> usize {
        self.categories.iter().map(|c| c.invalid_records).sum()
    }
}

/// Prints run statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Run:");
    println!("  Status: {}", stats.status.as_str());
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {} seconds", seconds);
    }
    println!("  Records added: {}", stats.records_added());
    println!("  Fetch failures: {}", stats.fetch_failures());
    println!("  Invalid pages: {}", stats.invalid_records());
    println!();

    println!("Categories:");
    for category in &stats.categories {
        println!(
            "  {} ({}): {} subcategories, {} listed, {} new, {} added, {} total",
            category.name,
            category.slug,
            category.subcategories_visited,
            category.urls_listed,
            category.new_urls,
            category.records_added,
            category.records_after()
        );
    }
    println!();

    println!(
        "Translation: {} requests, {} cache hits, {} failures",
        stats.translation.requests, stats.translation.cache_hits, stats.translation.failures
    );
}

/// Prints the persisted dataset, one line per category
pub fn print_dataset_summary(index: &[CategoryIndexEntry]) {
    println!("=== Dataset ===\n");

    let total: usize = index.iter().map(|entry| entry.species_count).sum();
    for entry in index {
        println!(
            "  {} / {} ({}): {} species in {} subcategories",
            entry.name,
            entry.name_tr,
            entry.slug,
            entry.species_count,
            entry.subcategories.len()
        );
    }
    println!();
    println!("Total species: {}", total);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_totals() {
        let mut stats = RunStatistics::start("abc123");
        let mut fish = CategoryStatistics::new("marine-fish", "Marine Fish", 10);
        fish.records_added = 3;
        fish.fetch_failures = 1;
        let mut corals = CategoryStatistics::new("corals", "Corals", 0);
        corals.records_added = 2;
        corals.invalid_records = 4;
        stats.categories = vec![fish, corals];

        assert_eq!(stats.records_added(), 5);
        assert_eq!(stats.fetch_failures(), 1);
        assert_eq!(stats.invalid_records(), 4);
        assert_eq!(stats.categories[0].records_after(), 13);
    }

    #[test]
    fn test_finish_sets_status() {
        let mut stats = RunStatistics::start("abc123");
        assert_eq!(stats.duration_seconds(), None);

        stats.finish(RunStatus::Interrupted);
        assert_eq!(stats.status, RunStatus::Interrupted);
        assert!(stats.duration_seconds().is_some());
    }
}
