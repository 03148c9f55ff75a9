/// Page state definitions for tracking crawl progress
///
/// This module defines the lifecycle of a single URL inside a crawl run.
use crate::CrawlError;
use std::fmt;

/// Represents the current state of a page in the crawl process
///
/// ```text
/// Discovered -> Fetching -> Extracted -> Done
///                   \
///                    -> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Page was admitted to the visited set and queued
    Discovered,

    /// Page is currently being fetched
    Fetching,

    /// Page body was fetched; outgoing links are being processed
    Extracted,

    // ===== Terminal States =====
    /// Page was fetched and all of its links processed
    Done,

    /// Fetch failed; never retried within a run
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if moving to `next` is a legal step
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Discovered, Self::Fetching)
                | (Self::Fetching, Self::Extracted)
                | (Self::Fetching, Self::Failed)
                | (Self::Extracted, Self::Done)
        )
    }

    /// Moves to `next`, rejecting illegal steps
    pub fn transition(self, next: PageState) -> Result<PageState, CrawlError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CrawlError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Fetching => "fetching",
            Self::Extracted => "extracted",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!PageState::Discovered.is_terminal());
        assert!(!PageState::Fetching.is_terminal());
        assert!(!PageState::Extracted.is_terminal());

        assert!(PageState::Done.is_terminal());
        assert!(PageState::Failed.is_terminal());
    }

    #[test]
    fn test_happy_path() {
        let state = PageState::Discovered
            .transition(PageState::Fetching)
            .and_then(|s| s.transition(PageState::Extracted))
            .and_then(|s| s.transition(PageState::Done))
            .unwrap();
        assert_eq!(state, PageState::Done);
    }

    #[test]
    fn test_fetch_failure_path() {
        let state = PageState::Discovered
            .transition(PageState::Fetching)
            .and_then(|s| s.transition(PageState::Failed))
            .unwrap();
        assert_eq!(state, PageState::Failed);
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(PageState::Discovered.transition(PageState::Done).is_err());
        assert!(PageState::Discovered.transition(PageState::Extracted).is_err());
        assert!(PageState::Extracted.transition(PageState::Failed).is_err());
        assert!(PageState::Done.transition(PageState::Fetching).is_err());
        assert!(PageState::Failed.transition(PageState::Fetching).is_err());
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = PageState::Done.transition(PageState::Fetching).unwrap_err();
        assert!(matches!(
            err,
            CrawlError::InvalidTransition {
                from: PageState::Done,
                to: PageState::Fetching
            }
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", PageState::Discovered), "discovered");
        assert_eq!(format!("{}", PageState::Failed), "failed");
    }
}
