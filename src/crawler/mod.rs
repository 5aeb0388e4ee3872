//! Crawler module for walking the catalog
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Randomized politeness delays
//! - Subcategory discovery on category pages
//! - Paginated product listing
//! - Overall harvest coordination

mod coordinator;
mod discovery;
mod fetcher;
mod governor;
mod lister;

pub use coordinator::{run_harvest, Coordinator, InterruptFlag};
pub use discovery::{
    discover_subcategories, extract_subcategories, is_skipped_collection, Subcategory,
    SKIP_SUBCATEGORY_PATTERNS,
};
pub use fetcher::{build_http_client, FetchedPage, Fetcher};
pub use governor::RateGovernor;
pub use lister::{extract_product_links, has_next_page, ProductLister};
