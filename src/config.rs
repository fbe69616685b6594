use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Markup and URL conventions of the listing site's results pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMarkup {
    /// CSS selector matching the listing anchors
    #[serde(default = "default_listing_selector")]
    pub listing_selector: String,

    /// CSS selector matching the active entry of the pagination widget
    #[serde(default = "default_pagination_selector")]
    pub pagination_selector: String,

    /// Data attribute (without the `data-` prefix) holding the page number
    #[serde(default = "default_ordinal_attribute")]
    pub ordinal_attribute: String,

    /// Query parameter carrying the page number
    #[serde(default = "default_page_param")]
    pub page_param: String,
}

impl Default for PageMarkup {
    fn default() -> Self {
        Self {
            listing_selector: default_listing_selector(),
            pagination_selector: default_pagination_selector(),
            ordinal_attribute: default_ordinal_attribute(),
            page_param: default_page_param(),
        }
    }
}

/// Configuration for a crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Results page to start from
    pub start_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Site markup used to find listings and the page number
    #[serde(default)]
    pub markup: PageMarkup,

    /// Stop after this many pages (no limit when absent)
    #[serde(default)]
    pub max_pages: Option<usize>,

    /// Upper bound for navigating to and reading a single page
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Directory holding saved searches
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl CrawlConfig {
    /// Create a new configuration with default values
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            webdriver_url: default_webdriver_url(),
            markup: PageMarkup::default(),
            max_pages: None,
            page_timeout_secs: default_page_timeout_secs(),
            data_dir: default_data_dir(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if provided
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.page_timeout_secs == 0 {
            return Err(Error::Config("page_timeout_secs must be positive".into()));
        }
        if self.max_pages == Some(0) {
            return Err(Error::Config("max_pages must be at least 1".into()));
        }
        if self.markup.page_param.is_empty() {
            return Err(Error::Config("page_param must not be empty".into()));
        }
        Ok(())
    }
}

fn default_listing_selector() -> String {
    ".product-item-image > a".to_string()
}

fn default_pagination_selector() -> String {
    "#PaginacionSuperior > div > ul > li.active".to_string()
}

fn default_ordinal_attribute() -> String {
    "num".to_string()
}

fn default_page_param() -> String {
    "pg".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_page_timeout_secs() -> u64 {
    45
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config = CrawlConfig::from_json(r#"{"start_url": "https://example.com/search"}"#)
            .unwrap();
        assert_eq!(config.start_url, "https://example.com/search");
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.markup, PageMarkup::default());
        assert_eq!(config.markup.page_param, "pg");
        assert_eq!(config.max_pages, None);
        assert_eq!(config.page_timeout_secs, 45);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_partial_markup_override() {
        let json = r#"{
            "start_url": "https://example.com/search",
            "markup": { "page_param": "page" },
            "max_pages": 3
        }"#;
        let config = CrawlConfig::from_json(json).unwrap();
        assert_eq!(config.markup.page_param, "page");
        assert_eq!(config.markup.listing_selector, ".product-item-image > a");
        assert_eq!(config.max_pages, Some(3));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let json = r#"{"start_url": "https://example.com", "page_timeout_secs": 0}"#;
        assert!(matches!(CrawlConfig::from_json(json), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_zero_page_limit() {
        let json = r#"{"start_url": "https://example.com", "max_pages": 0}"#;
        assert!(matches!(CrawlConfig::from_json(json), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_missing_start_url() {
        assert!(matches!(CrawlConfig::from_json("{}"), Err(Error::Json(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawl.json");
        std::fs::write(
            &path,
            r#"{"start_url": "https://example.com/a", "data_dir": "/tmp/searches"}"#,
        )
        .unwrap();

        let config = CrawlConfig::from_file(&path).unwrap();
        assert_eq!(config.start_url, "https://example.com/a");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/searches"));
    }
}
