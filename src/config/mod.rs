//! Configuration module for Site-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A crawl can also run entirely on [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use site_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExclusionConfig, OutputConfig, DEFAULT_EXCLUDED_EXTENSIONS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
