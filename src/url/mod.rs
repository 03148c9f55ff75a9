//! URL handling module for Site-Sweep
//!
//! This module provides href normalization into canonical [`PageUrl`] keys and
//! the [`ExclusionPolicy`] that keeps resource files and self-expanding link
//! patterns out of the crawl.

mod exclusion;
mod normalize;

// Re-export main types and functions
pub use exclusion::ExclusionPolicy;
pub use normalize::{normalize_href, PageUrl};
