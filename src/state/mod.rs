//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the lifecycle of a single URL (discovered, fetching, extracted, done, failed)

mod page_state;

pub use page_state::PageState;
