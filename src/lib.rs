pub mod config;
pub mod crawlers;
pub mod driver;
pub mod error;
pub mod parsers;
pub mod results;
pub mod routes;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::CrawlerConfig;
pub use error::CrawlError;
pub use results::{Company, CrawlResults, JobDetail, JobOverall};

use error::ConfigError;
use std::path::Path;

/// Builder for a crawl of one search keyword
pub struct JobSearch {
    keyword: String,
    config: CrawlerConfig,
}

impl JobSearch {
    /// Create a new search with default configuration
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            config: CrawlerConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: CrawlerConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = CrawlerConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(self, json: &str) -> Result<Self, ConfigError> {
        let config = CrawlerConfig::from_json(json)?;
        Ok(self.with_config(config))
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.config.window_width = width;
        self.config.window_height = height;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.config.search_url = url.into();
        self
    }

    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.config.webdriver_url = url.into();
        self
    }

    /// Enable or disable the per-listing detail fetch
    pub fn with_details(mut self, enabled: bool) -> Self {
        self.config.fetch_details = enabled;
        self
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Launch the browser and run the crawl
    pub async fn run(self) -> Result<CrawlResults, CrawlError> {
        let mut config = self.config;

        // Override the WebDriver URL with an environment variable if provided
        config.apply_webdriver_override(std::env::var("WEBDRIVER_URL").ok());

        crawlers::web::start(&config, &self.keyword).await
    }
}
