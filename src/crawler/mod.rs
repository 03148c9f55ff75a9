//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with per-request timeouts
//! - HTML parsing and link extraction
//! - The shared frontier and visited set
//! - Overall crawl coordination across the worker pool

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod visited;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
pub use parser::LinkExtractor;
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the seed and configuration
/// 2. Create the page sink and the HTTP client
/// 3. Fetch pages with the worker pool until the frontier drains
/// 4. Return the crawl summary
///
/// # Arguments
///
/// * `seed` - Absolute http(s) URL; its origin bounds the crawl
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed
/// * `Err(CrawlError)` - Crawl could not start or the sink failed
pub async fn crawl(seed: &str, config: Config) -> Result<CrawlSummary, CrawlError> {
    Coordinator::new(seed, config)?.run().await
}
