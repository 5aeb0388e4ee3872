//! Integration tests for Aqua-Harvest
//!
//! These tests run the harvester against wiremock catalog servers and check
//! the files it leaves on disk.

mod common;
mod crawl_tests;
mod postprocess_tests;
