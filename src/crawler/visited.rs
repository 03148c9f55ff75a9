//! The visited set: every URL ever admitted to a crawl run

use crate::url::PageUrl;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Shared dedup ledger
///
/// Entries are only ever added. [`VisitedSet::insert`] is the single
/// synchronization point that gives the at-most-once-fetch guarantee: of any
/// number of concurrent discoverers of the same URL, exactly one wins.
#[derive(Debug, Default)]
pub struct VisitedSet {
    keys: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically checks and inserts; returns true if `url` was not present
    pub fn insert(&self, url: &PageUrl) -> bool {
        // The set stays consistent even if a holder panicked
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        keys.insert(url.as_str().to_string())
    }

    pub fn len(&self) -> usize {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
