//! Output module for page records and crawl summaries
//!
//! This module handles:
//! - Writing page records to the append-only sink
//! - Counting discovered, fetched and failed pages
//! - Reporting the end-of-run summary

mod sink;
pub mod stats;

pub use sink::{OutputError, OutputResult, PageSink, TextFileSink};
pub use stats::{format_summary, print_summary, CrawlStats, CrawlSummary};
