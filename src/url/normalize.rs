use crate::UrlError;
use std::fmt;
use std::hash::{Hash, Hasher};
use url::{Origin, Position, Url};

/// A normalized, absolute page URL
///
/// Equality and hashing use the canonical key: the WHATWG serialization of
/// the URL with every trailing slash removed. Two spellings of the same
/// resource (`/a/` and `/a`, `HOST` and `host`) therefore share one key.
#[derive(Debug, Clone)]
pub struct PageUrl {
    url: Url,
    key: String,
}

impl PageUrl {
    /// Builds the canonical key for a seed URL
    ///
    /// The seed is trusted input: it only gets trailing-slash normalization and
    /// is never checked against the exclusion policy. A fragment is dropped,
    /// since it never reaches the server.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_sweep::url::PageUrl;
    ///
    /// let seed = PageUrl::from_seed("https://Example.com/").unwrap();
    /// assert_eq!(seed.as_str(), "https://example.com");
    /// ```
    pub fn from_seed(seed: &str) -> Result<Self, UrlError> {
        let mut url = Url::parse(seed.trim())?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        if url.host_str().is_none() {
            return Err(UrlError::MissingHost);
        }

        url.set_fragment(None);

        Ok(Self::from_url(url))
    }

    fn from_url(mut url: Url) -> Self {
        let path = url.path();
        if path.len() > 1 && path.ends_with('/') {
            let trimmed = path.trim_end_matches('/').to_string();
            url.set_path(if trimmed.is_empty() { "/" } else { &trimmed });
        }

        let key = url.as_str().trim_end_matches('/').to_string();
        Self { url, key }
    }

    /// The canonical key, as written to the sink
    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn origin(&self) -> Origin {
        self.url.origin()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Everything after the authority: path, query and fragment
    pub fn path_query_fragment(&self) -> &str {
        &self.url[Position::BeforePath..]
    }
}

impl PartialEq for PageUrl {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PageUrl {}

impl Hash for PageUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Normalizes a raw href against the site's origin
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty hrefs
/// 2. Origin-relative paths (`/about`) get the origin prepended
/// 3. Scheme-relative hrefs (`//host/about`) get the origin's scheme
/// 4. Parse; reject anything that is not an absolute URL
/// 5. Reject URLs whose scheme, host or port differ from the origin
/// 6. Remove trailing slashes
///
/// Query strings and fragments are kept as-is.
///
/// # Returns
///
/// * `Some(PageUrl)` - A same-origin page URL
/// * `None` - The href is out of scope
///
/// # Examples
///
/// ```
/// use site_sweep::url::normalize_href;
/// use url::Url;
///
/// let origin = Url::parse("https://example.com").unwrap().origin();
/// let a = normalize_href("https://example.com/a/", &origin).unwrap();
/// let b = normalize_href("/a", &origin).unwrap();
/// assert_eq!(a, b);
/// assert!(normalize_href("https://other.com/a", &origin).is_none());
/// ```
pub fn normalize_href(raw: &str, origin: &Origin) -> Option<PageUrl> {
    let href = raw.trim();
    if href.is_empty() {
        return None;
    }

    let scheme = match origin {
        Origin::Tuple(scheme, _, _) => scheme,
        Origin::Opaque(_) => return None,
    };

    let absolute = if let Some(rest) = href.strip_prefix("//") {
        format!("{}://{}", scheme, rest)
    } else if href.starts_with('/') {
        format!("{}{}", origin.ascii_serialization(), href)
    } else {
        href.to_string()
    };

    let url = Url::parse(&absolute).ok()?;
    if url.origin() != *origin {
        return None;
    }

    Some(PageUrl::from_url(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Origin {
        Url::parse("https://example.com").unwrap().origin()
    }

    fn normalize(href: &str) -> Option<String> {
        normalize_href(href, &origin()).map(|url| url.as_str().to_string())
    }

    #[test]
    fn test_trailing_slash_equivalence() {
        assert_eq!(
            normalize("https://example.com/a/"),
            normalize("https://example.com/a")
        );
        assert_eq!(normalize("https://example.com/a/").unwrap(), "https://example.com/a");
    }

    #[test]
    fn test_multiple_trailing_slashes() {
        assert_eq!(normalize("/a///").unwrap(), "https://example.com/a");
    }

    #[test]
    fn test_root_has_no_trailing_slash() {
        assert_eq!(normalize("/").unwrap(), "https://example.com");
        assert_eq!(normalize("https://example.com/").unwrap(), "https://example.com");
        assert_eq!(normalize("https://example.com").unwrap(), "https://example.com");
    }

    #[test]
    fn test_origin_relative_gets_origin() {
        assert_eq!(
            normalize("/about/team").unwrap(),
            "https://example.com/about/team"
        );
    }

    #[test]
    fn test_scheme_relative_same_host() {
        assert_eq!(
            normalize("//example.com/blog").unwrap(),
            "https://example.com/blog"
        );
    }

    #[test]
    fn test_scheme_relative_other_host_rejected() {
        assert!(normalize("//cdn.example.net/blog").is_none());
    }

    #[test]
    fn test_foreign_origin_rejected() {
        assert!(normalize("https://other.com/a").is_none());
        assert!(normalize("https://sub.example.com/a").is_none());
    }

    #[test]
    fn test_scheme_mismatch_rejected() {
        assert!(normalize("http://example.com/a").is_none());
    }

    #[test]
    fn test_port_mismatch_rejected() {
        assert!(normalize("https://example.com:8443/a").is_none());
    }

    #[test]
    fn test_lookalike_host_rejected() {
        assert!(normalize("https://example.com.evil.org/a").is_none());
    }

    #[test]
    fn test_host_is_case_insensitive() {
        assert_eq!(
            normalize("https://EXAMPLE.com/Page").unwrap(),
            "https://example.com/Page"
        );
    }

    #[test]
    fn test_non_page_hrefs_rejected() {
        assert!(normalize("").is_none());
        assert!(normalize("   ").is_none());
        assert!(normalize("mailto:team@example.com").is_none());
        assert!(normalize("javascript:void(0)").is_none());
        assert!(normalize("relative/path").is_none());
    }

    #[test]
    fn test_fragment_and_query_are_distinct() {
        let plain = normalize("/a").unwrap();
        let fragment = normalize("/a#top").unwrap();
        let query = normalize("/a?x=1").unwrap();

        assert_eq!(fragment, "https://example.com/a#top");
        assert_eq!(query, "https://example.com/a?x=1");
        assert_ne!(plain, fragment);
        assert_ne!(plain, query);
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(normalize("  /a  ").unwrap(), "https://example.com/a");
    }

    #[test]
    fn test_seed_normalization() {
        let seed = PageUrl::from_seed("https://example.com/start/").unwrap();
        assert_eq!(seed.as_str(), "https://example.com/start");
        assert_eq!(seed.origin(), origin());
    }

    #[test]
    fn test_seed_drops_fragment() {
        let seed = PageUrl::from_seed("https://example.com/#top").unwrap();
        assert_eq!(seed.as_str(), "https://example.com");

        // A link back to the root shares the seed's key
        assert_eq!(normalize_href("/", &origin()).unwrap(), seed);
    }

    #[test]
    fn test_seed_invalid_scheme() {
        let result = PageUrl::from_seed("ftp://example.com/");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_seed_malformed() {
        let result = PageUrl::from_seed("not a url");
        assert!(matches!(result.unwrap_err(), UrlError::Parse(_)));
    }

    #[test]
    fn test_seed_with_port() {
        let seed = PageUrl::from_seed("http://127.0.0.1:8080/").unwrap();
        assert_eq!(seed.as_str(), "http://127.0.0.1:8080");

        let link = normalize_href("/page", &seed.origin()).unwrap();
        assert_eq!(link.as_str(), "http://127.0.0.1:8080/page");
    }

    #[test]
    fn test_equal_keys_hash_equal() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(normalize_href("/a/", &origin()).unwrap());
        assert!(!set.insert(normalize_href("https://example.com/a", &origin()).unwrap()));
    }

    #[test]
    fn test_path_query_fragment() {
        let url = normalize_href("/a/b?x=1#y", &origin()).unwrap();
        assert_eq!(url.path(), "/a/b");
        assert_eq!(url.path_query_fragment(), "/a/b?x=1#y");
    }
}
