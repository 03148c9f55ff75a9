use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Site-Sweep
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    pub exclusion: ExclusionConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Number of fetch workers running in parallel
    pub concurrency: usize,

    /// Per-request timeout (seconds)
    pub request_timeout: u64,

    /// Global time limit for the whole crawl (seconds)
    pub max_duration: Option<u64>,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration.map(Duration::from_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            request_timeout: 15,
            max_duration: None,
            user_agent: format!("site-sweep/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the newline-delimited page list
    pub pages_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pages_path: "pages.txt".to_string(),
        }
    }
}

/// Policy table for URLs that must never be visited
///
/// The defaults were collected from one site's link patterns; other sites
/// usually need their own markers and segments.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExclusionConfig {
    /// Non-HTML resource extensions, matched case-insensitively against the path
    pub extensions: Vec<String>,

    /// Substrings marking dead or deep-link URLs
    pub markers: Vec<String>,

    /// Path segments that disqualify a URL (e.g. `i` for `/i/` short links)
    pub segments: Vec<String>,

    /// Characters that address in-page anchors or bracketed pseudo-paths
    pub characters: String,
}

/// Document, archive, image, audio/video and font formats
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[
    ".css", ".js", ".json", ".xml", ".pdf", ".txt", ".doc", ".docx", ".xls", ".xlsx", ".ppt",
    ".pptx", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".bmp", ".tiff", ".tif", ".mp3",
    ".wav", ".ogg", ".mp4", ".webm", ".avi", ".mov", ".mkv", ".zip", ".rar", ".7z", ".tar", ".gz",
    ".ico", ".eot", ".woff", ".ttf", ".otf",
];

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXCLUDED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            markers: vec!["-deeplinks".to_string()],
            // `undefined` segments come from broken link generation and expand forever
            segments: vec!["i".to_string(), "undefined".to_string()],
            characters: "#[]".to_string(),
        }
    }
}
