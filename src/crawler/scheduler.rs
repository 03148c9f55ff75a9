//! Scheduler for the crawl frontier
//!
//! This module handles:
//! - The shared queue of discovered-but-not-yet-fetched URLs
//! - Pending-work accounting that detects when the crawl is finished
//! - Propagating an external stop to idle workers

use crate::url::PageUrl;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// Scheduler manages the frontier queue consumed by the worker pool
///
/// A URL counts as pending from [`Scheduler::enqueue`] until the worker that
/// took it calls [`Scheduler::complete`]. Children are enqueued before their
/// parent completes, so the count only reaches zero once the frontier is
/// empty and nothing is in flight.
pub struct Scheduler {
    queue_tx: mpsc::UnboundedSender<PageUrl>,
    queue_rx: Mutex<mpsc::UnboundedReceiver<PageUrl>>,

    /// URLs queued or in flight
    pending: AtomicUsize,

    /// Fires when pending work drops to zero
    drained: CancellationToken,

    /// External stop: Ctrl-C, time limit or a fatal worker error
    shutdown: CancellationToken,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `shutdown` - Token that stops the crawl early when cancelled
    pub fn new(shutdown: CancellationToken) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();

        Self {
            queue_tx,
            queue_rx: Mutex::new(queue_rx),
            pending: AtomicUsize::new(0),
            drained: CancellationToken::new(),
            shutdown,
        }
    }

    /// Adds a URL to the frontier
    pub fn enqueue(&self, url: PageUrl) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        // The receiver lives as long as `self`, so sending cannot fail
        let _ = self.queue_tx.send(url);
    }

    /// Gets the next URL to fetch
    ///
    /// Waits until a URL is available.
    ///
    /// # Returns
    ///
    /// * `Some(PageUrl)` - A URL to fetch
    /// * `None` - The frontier drained or the crawl was stopped
    pub async fn next_url(&self) -> Option<PageUrl> {
        if self.is_stopped() {
            return None;
        }

        let mut queue = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => return None,
            _ = self.drained.cancelled() => return None,
            queue = self.queue_rx.lock() => queue,
        };

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            _ = self.drained.cancelled() => None,
            url = queue.recv() => url,
        }
    }

    /// Marks one dequeued URL as fully processed
    pub fn complete(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            tracing::debug!("Frontier drained");
            self.drained.cancel();
        }
    }

    /// Returns the number of URLs queued or in flight
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Returns whether all discovered work has been processed
    pub fn is_drained(&self) -> bool {
        self.drained.is_cancelled()
    }

    /// Returns whether the crawl was stopped early
    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn is_stopped(&self) -> bool {
        self.is_drained() || self.is_cancelled()
    }
}
