//! Output module for run reporting
//!
//! This module handles:
//! - Recording harvest statistics while the coordinator runs
//! - Printing statistics to the console
//! - Writing the markdown run report

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use stats::{
    print_dataset_summary, print_statistics, CategoryStatistics, RunStatistics, RunStatus,
};
