//! HTML link extraction
//!
//! The extractor is a coarse first filter: it only yields hrefs that already
//! look same-origin. Normalization and the exclusion policy refine them later.

use crate::CrawlError;
use scraper::{Html, Selector};
use url::{Origin, Url};

const LINK_SELECTOR: &str = "a[href], area[href], link[rel='canonical'][href]";

/// Scans HTML for same-origin href candidates
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    selector: Selector,
    origin: Origin,
}

impl LinkExtractor {
    pub fn new(origin: &Origin) -> Result<Self, CrawlError> {
        let selector =
            Selector::parse(LINK_SELECTOR).map_err(|e| CrawlError::Selector(format!("{:?}", e)))?;

        Ok(Self {
            selector,
            origin: origin.clone(),
        })
    }

    /// Lazily yields the raw href of every qualifying element in `document`
    ///
    /// # Link Extraction Rules
    ///
    /// **Include:**
    /// - `<a href>`, `<area href>` and `<link rel="canonical" href>`
    /// - hrefs starting with `/`
    /// - absolute hrefs on the same origin (scheme and host are case-insensitive,
    ///   default ports may be spelled out)
    ///
    /// **Exclude:**
    /// - `<a href download>`
    /// - relative paths, other origins, `mailto:`, `javascript:` and friends
    ///
    /// Duplicates within one page are yielded as often as they appear.
    pub fn links<'a>(&'a self, document: &'a Html) -> impl Iterator<Item = &'a str> + 'a {
        document
            .select(&self.selector)
            .filter(|element| element.value().attr("download").is_none())
            .filter_map(|element| element.value().attr("href"))
            .map(str::trim)
            .filter(move |href| self.is_candidate(href))
    }

    fn is_candidate(&self, href: &str) -> bool {
        if href.starts_with('/') {
            return true;
        }

        match Url::parse(href) {
            Ok(url) => url.origin() == self.origin,
            Err(_) => false,
        }
    }
}
