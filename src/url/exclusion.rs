use crate::config::ExclusionConfig;
use crate::url::PageUrl;
use std::collections::HashSet;

/// Decides whether a normalized URL must never be visited
///
/// The policy is a pure predicate built once per crawl from the configured
/// table. It runs before the visited-set check, so an excluded URL never
/// takes a visited slot or a fetch.
#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    /// Lowercased extensions, each starting with `.`
    extensions: Vec<String>,
    markers: Vec<String>,
    segments: HashSet<String>,
    characters: Vec<char>,
}

impl ExclusionPolicy {
    pub fn new(config: &ExclusionConfig) -> Self {
        Self {
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.to_ascii_lowercase())
                .collect(),
            markers: config.markers.clone(),
            segments: config.segments.iter().cloned().collect(),
            characters: config.characters.chars().collect(),
        }
    }

    /// Returns true if the URL must never be fetched
    ///
    /// # Exclusion Rules
    ///
    /// | Rule | Example |
    /// |------|---------|
    /// | Path ends with a resource extension | `/brochure.PDF` |
    /// | Contains a dead-link marker | `/card-deeplinks` |
    /// | Contains an excluded segment | `/i/abc`, `/blog/undefined/x` |
    /// | Contains an anchor or bracket character | `/faq#q1`, `/[slug]` |
    ///
    /// Only the part after the authority is inspected, so a bracketed IPv6
    /// host does not trip the character rule.
    pub fn is_excluded(&self, url: &PageUrl) -> bool {
        let tail = url.path_query_fragment();

        self.has_excluded_extension(url.path())
            || self.markers.iter().any(|marker| tail.contains(marker.as_str()))
            || self.has_excluded_segment(url)
            || tail.contains(self.characters.as_slice())
    }

    fn has_excluded_extension(&self, path: &str) -> bool {
        let path = path.to_ascii_lowercase();
        self.extensions.iter().any(|ext| path.ends_with(ext.as_str()))
    }

    fn has_excluded_segment(&self, url: &PageUrl) -> bool {
        url.url()
            .path_segments()
            .map(|mut segments| segments.any(|segment| self.segments.contains(segment)))
            .unwrap_or(false)
    }
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self::new(&ExclusionConfig::default())
    }
}
