//! Harvest coordinator - main crawl orchestration logic
//!
//! This module contains the sequential walk that ties the pipeline
//! together, including:
//! - Loading each category's persisted state
//! - Discovering subcategories and listing their products
//! - Extracting and translating new products only
//! - Persisting after every subcategory
//! - Handling operator interrupts
//! - Writing the category index and run report

use crate::config::{CategoryConfig, Config};
use crate::crawler::discovery::{discover_subcategories, Subcategory};
use crate::crawler::{Fetcher, ProductLister, RateGovernor};
use crate::extract::ProductExtractor;
use crate::output::{write_markdown_report, CategoryStatistics, RunStatistics, RunStatus};
use crate::state::CategoryState;
use crate::storage::write_category_index;
use crate::translate::{NameProtectingTranslator, NameRegistry, TranslationBackend};
use crate::url::product_id;
use crate::HarvestError;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop request shared with a signal handler
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Main harvest coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Fetcher,
    lister: ProductLister,
    extractor: ProductExtractor,
    translator: NameProtectingTranslator,
    coarse: RateGovernor,
    interrupt: InterruptFlag,
    config_hash: String,
}

impl Coordinator {
    /// Creates a coordinator translating through the configured endpoint
    ///
    /// The protected-name registry is loaded here, once, from the
    /// collections already on disk.
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let registry = Arc::new(NameRegistry::load(config.output.data_dir(), &config.categories));
        let translator = NameProtectingTranslator::from_config(&config, registry)?;
        Self::with_translator(config, translator)
    }

    /// Creates a coordinator with a custom translation backend
    pub fn with_backend(
        config: Config,
        backend: Box<dyn TranslationBackend>,
    ) -> Result<Self, HarvestError> {
        let registry = Arc::new(NameRegistry::load(config.output.data_dir(), &config.categories));
        let translator = NameProtectingTranslator::new(registry, backend, &config.translation);
        Self::with_translator(config, translator)
    }

    fn with_translator(
        config: Config,
        translator: NameProtectingTranslator,
    ) -> Result<Self, HarvestError> {
        Ok(Self {
            fetcher: Fetcher::new(&config)?,
            lister: ProductLister::new(&config),
            extractor: ProductExtractor::new(&config)?,
            coarse: RateGovernor::coarse(&config.rate_limit),
            translator,
            interrupt: InterruptFlag::new(),
            config_hash: String::new(),
            config: Arc::new(config),
        })
    }

    /// Records the configuration hash shown in the run report
    pub fn with_config_hash(mut self, config_hash: impl Into<String>) -> Self {
        self.config_hash = config_hash.into();
        self
    }

    /// A handle that stops the run at the next product or subcategory
    pub fn interrupt_flag(&self) -> InterruptFlag {
        self.interrupt.clone()
    }

    /// Runs the harvest over every configured category
    ///
    /// A category that fails (for example, an unreadable collection file)
    /// is logged and skipped. On interrupt, the current category is
    /// persisted and no further category is started. The category index
    /// and the run report are written in every case.
    pub async fn run(&mut self) -> Result<RunStatistics, HarvestError> {
        let config = Arc::clone(&self.config);
        let mut stats = RunStatistics::start(&self.config_hash);
        let mut status = RunStatus::Completed;

        for category in &config.categories {
            if self.interrupt.is_triggered() {
                status = RunStatus::Interrupted;
                break;
            }

            let mut category_stats = CategoryStatistics::new(&category.slug, &category.name, 0);
            let result = self.harvest_category(category, &mut category_stats).await;
            stats.categories.push(category_stats);

            match result {
                Ok(()) => {}
                Err(HarvestError::Interrupted) => {
                    tracing::warn!("Interrupted during {}, progress saved", category.name);
                    status = RunStatus::Interrupted;
                    break;
                }
                Err(e) => {
                    tracing::error!("Category {} failed: {}", category.name, e);
                }
            }
        }

        if let Err(e) = write_category_index(
            &config.output.index_path(),
            config.output.data_dir(),
            &config.categories,
        ) {
            tracing::error!("Failed to write category index: {}", e);
        }

        stats.translation = self.translator.stats();
        stats.finish(status);

        if let Err(e) = write_markdown_report(&stats, Path::new(&config.output.report_path)) {
            tracing::warn!("Failed to write run report: {}", e);
        }

        tracing::info!(
            "Harvest {}: {} records added, {} fetch failures, {} invalid pages",
            status.as_str(),
            stats.records_added(),
            stats.fetch_failures(),
            stats.invalid_records()
        );

        Ok(stats)
    }

    /// Harvests one category into its persisted collection
    ///
    /// Returns [`HarvestError::Interrupted`] after persisting when the
    /// interrupt flag is seen.
    async fn harvest_category(
        &mut self,
        category: &CategoryConfig,
        stats: &mut CategoryStatistics,
    ) -> Result<(), HarvestError> {
        tracing::info!("[CATEGORY] {} ({})", category.name, category.name_tr);

        let mut state = CategoryState::load(self.config.output.data_dir(), category)?;
        stats.records_before = state.len();
        if !state.is_empty() {
            tracing::info!("Resuming with {} records already saved", state.len());
        }

        let mut subcategories = discover_subcategories(&self.fetcher, category).await;
        tracing::info!("Found {} subcategories", subcategories.len());
        self.coarse.wait().await;

        if subcategories.is_empty() {
            tracing::warn!("No subcategories for {}, listing the category itself", category.name);
            subcategories.push(Subcategory::whole_category(category));
            stats.used_fallback = true;
        }

        for subcategory in &subcategories {
            if self.interrupt.is_triggered() {
                state.persist()?;
                return Err(HarvestError::Interrupted);
            }

            tracing::info!("[SUBCATEGORY] {}", subcategory.name);
            stats.subcategories_visited += 1;

            let listed = self
                .lister
                .list_product_urls(&self.fetcher, &subcategory.url)
                .await;
            let new_urls: Vec<&String> = listed
                .iter()
                .filter(|url| product_id(url).is_some_and(|id| !state.contains(&id)))
                .collect();

            stats.urls_listed += listed.len();
            stats.new_urls += new_urls.len();
            tracing::info!("Found {} products, {} new", listed.len(), new_urls.len());

            for url in new_urls {
                if self.interrupt.is_triggered() {
                    state.persist()?;
                    return Err(HarvestError::Interrupted);
                }

                // the same id can be listed under two slugs
                if product_id(url).is_some_and(|id| state.contains(&id)) {
                    continue;
                }

                match self
                    .extractor
                    .extract(
                        &self.fetcher,
                        &mut self.translator,
                        url,
                        &category.slug,
                        &subcategory.name,
                    )
                    .await
                {
                    Ok(Some(record)) => {
                        tracing::info!("[OK] {}", record.name);
                        if state.append(record) {
                            stats.records_added += 1;
                        }
                    }
                    Ok(None) => {
                        tracing::warn!("[FAIL] {}: no product id or name", url);
                        stats.invalid_records += 1;
                    }
                    Err(e) => {
                        tracing::warn!("[FAIL] {}: {}", url, e);
                        stats.fetch_failures += 1;
                    }
                }

                self.coarse.wait().await;
            }

            state.persist()?;
        }

        Ok(())
    }
}

/// Runs a complete harvest with the configured translation endpoint
///
/// # Example
///
/// ```no_run
/// use aqua_harvest::config::load_config;
/// use aqua_harvest::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let stats = run_harvest(config, "").await?;
/// println!("{} records added", stats.records_added());
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config, config_hash: &str) -> Result<RunStatistics, HarvestError> {
    let mut coordinator = Coordinator::new(config)?.with_config_hash(config_hash);
    coordinator.run().await
}
