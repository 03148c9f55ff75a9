//! Crawl statistics and the end-of-run summary
//!
//! Counters are shared by every worker and updated with relaxed atomics; the
//! summary is built once after all workers have joined.

use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters for a running crawl
#[derive(Debug, Default)]
pub struct CrawlStats {
    /// Unique pages admitted (one per page record)
    discovered: AtomicU64,

    /// Pages whose fetch and extraction completed
    fetched: AtomicU64,

    /// Pages whose fetch failed
    failed: AtomicU64,

    /// In-flight fetches dropped because the crawl was cancelled
    abandoned: AtomicU64,

    /// Same-origin links rejected by the exclusion policy
    excluded: AtomicU64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one page record; returns the new total
    pub fn record_discovered(&self) -> u64 {
        self.discovered.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Counts a URL that reached a terminal state
    pub fn record_outcome(&self, state: PageState) {
        match state {
            PageState::Done => {
                self.fetched.fetch_add(1, Ordering::Relaxed);
            }
            PageState::Failed => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    pub fn record_abandoned(&self) {
        self.abandoned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_excluded(&self) {
        self.excluded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn discovered(&self) -> u64 {
        self.discovered.load(Ordering::Relaxed)
    }

    pub fn fetched(&self) -> u64 {
        self.fetched.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn abandoned(&self) -> u64 {
        self.abandoned.load(Ordering::Relaxed)
    }

    pub fn excluded(&self) -> u64 {
        self.excluded.load(Ordering::Relaxed)
    }
}

/// Summary of a finished (or cancelled) crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub seed: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,

    /// Unique pages recorded to the sink
    pub pages: u64,
    pub fetched: u64,
    pub failed: u64,
    pub abandoned: u64,
    pub excluded: u64,

    /// True if the run stopped before the frontier drained
    pub cancelled: bool,
}

impl CrawlSummary {
    pub fn from_stats(
        seed: String,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        stats: &CrawlStats,
        cancelled: bool,
    ) -> Self {
        Self {
            seed,
            started_at,
            finished_at: Utc::now(),
            elapsed,
            pages: stats.discovered(),
            fetched: stats.fetched(),
            failed: stats.failed(),
            abandoned: stats.abandoned(),
            excluded: stats.excluded(),
            cancelled,
        }
    }

    /// Pages fetched per second of wall time
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.fetched as f64 / secs
    }
}

/// Renders a summary as the multi-line report shown at the end of a run
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, summary);
    out
}

fn write_report(out: &mut String, summary: &CrawlSummary) -> fmt::Result {
    writeln!(out, "=== Crawl Summary ===\n")?;

    writeln!(out, "Seed: {}", summary.seed)?;
    writeln!(out, "Started: {}", summary.started_at.to_rfc3339())?;
    writeln!(out, "Finished: {}", summary.finished_at.to_rfc3339())?;
    writeln!(out, "Elapsed: {:.2?}", summary.elapsed)?;
    if summary.cancelled {
        writeln!(out, "Status: cancelled (partial results)")?;
    } else {
        writeln!(out, "Status: complete")?;
    }
    writeln!(out)?;

    writeln!(out, "Pages:")?;
    writeln!(out, "  Unique pages recorded: {}", summary.pages)?;
    writeln!(out, "  Fetched: {}", summary.fetched)?;
    writeln!(out, "  Failed: {}", summary.failed)?;
    if summary.abandoned > 0 {
        writeln!(out, "  Abandoned: {}", summary.abandoned)?;
    }
    writeln!(out, "  Excluded links: {}", summary.excluded)?;
    writeln!(out)?;

    writeln!(out, "Rate: {:.2} pages/sec", summary.rate())
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", format_summary(summary));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_discovered_returns_total() {
        let stats = CrawlStats::new();
        assert_eq!(stats.record_discovered(), 1);
        assert_eq!(stats.record_discovered(), 2);
        assert_eq!(stats.discovered(), 2);
    }

    #[test]
    fn test_record_outcome() {
        let stats = CrawlStats::new();
        stats.record_outcome(PageState::Done);
        stats.record_outcome(PageState::Done);
        stats.record_outcome(PageState::Failed);
        stats.record_outcome(PageState::Fetching);

        assert_eq!(stats.fetched(), 2);
        assert_eq!(stats.failed(), 1);
    }

    #[test]
    fn test_summary_from_stats() {
        let stats = CrawlStats::new();
        stats.record_discovered();
        stats.record_outcome(PageState::Done);
        stats.record_excluded();
        stats.record_abandoned();

        let summary = CrawlSummary::from_stats(
            "https://example.com".to_string(),
            Utc::now(),
            Duration::from_secs(2),
            &stats,
            true,
        );

        assert_eq!(summary.pages, 1);
        assert_eq!(summary.fetched, 1);
        assert_eq!(summary.excluded, 1);
        assert_eq!(summary.abandoned, 1);
        assert!(summary.cancelled);
        assert!((summary.rate() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_rate_zero_elapsed() {
        let summary =
            CrawlSummary::from_stats(String::new(), Utc::now(), Duration::ZERO, &CrawlStats::new(), false);
        assert_eq!(summary.rate(), 0.0);
    }

    #[test]
    fn test_format_summary_reports_status() {
        let stats = CrawlStats::new();
        stats.record_discovered();
        stats.record_abandoned();

        let cancelled = CrawlSummary::from_stats(
            "https://example.com".to_string(),
            Utc::now(),
            Duration::from_secs(1),
            &stats,
            true,
        );
        let report = format_summary(&cancelled);
        assert!(report.contains("Status: cancelled (partial results)"));
        assert!(report.contains("Abandoned: 1"));

        let complete = CrawlSummary {
            cancelled: false,
            abandoned: 0,
            ..cancelled
        };
        let report = format_summary(&complete);
        assert!(report.contains("Status: complete"));
        assert!(!report.contains("Abandoned"));
    }
}
