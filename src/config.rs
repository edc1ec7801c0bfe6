use crate::error::ConfigError;
use crate::utils::permission_origin;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Configuration for one crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Site root; browser permissions are granted for its origin
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Page carrying the search form
    #[serde(default = "default_search_url")]
    pub search_url: String,

    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Upper bound for each wait-for-element call
    #[serde(default = "default_element_timeout_secs")]
    pub element_timeout_secs: u64,

    /// Upper bound for a navigation including the network-idle wait
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// How long the resource count must stay unchanged to call the page idle
    #[serde(default = "default_network_idle_ms")]
    pub network_idle_ms: u64,

    /// Visit every listing and extract a detail record
    #[serde(default)]
    pub fetch_details: bool,

    #[serde(default)]
    pub selectors: SiteSelectors,

    #[serde(default)]
    pub detail_routes: DetailRoutes,
}

/// CSS selectors describing a results page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    pub search_input: String,
    pub results_container: String,
    pub listing_card: String,
    /// Title/link element inside a card
    pub listing_link: String,
    /// Attribute of the link element holding the title
    pub listing_title_attr: String,
    pub pagination: String,
    pub pagination_link: String,
    pub current_page: String,
    /// Classes on the last pagination link that mean there is no next page
    pub end_markers: Vec<String>,
    pub listing_detail: DetailSelectors,
    pub brand_detail: DetailSelectors,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            search_input: "input#fts_id".to_string(),
            results_container: "div.main_cate".to_string(),
            listing_card: "div.item_cate".to_string(),
            listing_link: "div.center_cate_l h3 a.title_cate".to_string(),
            listing_title_attr: "title".to_string(),
            pagination: "div.clr".to_string(),
            pagination_link: "a".to_string(),
            current_page: "a.jp-current".to_string(),
            end_markers: vec!["next".to_string(), "last".to_string()],
            listing_detail: DetailSelectors::default(),
            brand_detail: DetailSelectors::brand(),
        }
    }
}

/// CSS selectors for one kind of detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    /// Required; a page without it is treated as a failed fetch
    pub title: String,
    pub salary: String,
    pub location: String,
    pub deadline: String,
    pub description: String,
    pub company_link: String,
    pub company_name: String,
    pub company_address: String,
    pub company_logo: String,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            title: "h1.title_detail".to_string(),
            salary: "div.salary_detail span".to_string(),
            location: "div.location_detail span".to_string(),
            deadline: "div.deadline_detail span".to_string(),
            description: "div.box_mota".to_string(),
            company_link: "div.company_detail a".to_string(),
            company_name: "div.company_detail h2".to_string(),
            company_address: "div.company_detail p.address".to_string(),
            company_logo: "div.company_detail img".to_string(),
        }
    }
}

impl DetailSelectors {
    /// Selectors for listings rendered inside a company brand page
    pub fn brand() -> Self {
        Self {
            title: "div.brand_job h2.job_title".to_string(),
            salary: "div.brand_job .job_salary".to_string(),
            location: "div.brand_job .job_location".to_string(),
            deadline: "div.brand_job .job_deadline".to_string(),
            description: "div.brand_job div.job_description".to_string(),
            company_link: "div.brand_header a.brand_link".to_string(),
            company_name: "div.brand_header h1".to_string(),
            company_address: "div.brand_header .brand_address".to_string(),
            company_logo: "div.brand_header img.brand_logo".to_string(),
        }
    }
}

/// Regex patterns used to pick the extraction routine for a listing URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailRoutes {
    pub listing_pattern: String,
    pub brand_pattern: String,
}

impl Default for DetailRoutes {
    fn default() -> Self {
        Self {
            listing_pattern: r"/viec-lam/".to_string(),
            brand_pattern: r"/brand/".to_string(),
        }
    }
}

/// Default value for base_url
fn default_base_url() -> String {
    "https://timviec365.vn/".to_string()
}

/// Default value for search_url
fn default_search_url() -> String {
    "https://timviec365.vn/".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1200
}

fn default_window_height() -> u32 {
    800
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_element_timeout_secs() -> u64 {
    30
}

fn default_navigation_timeout_secs() -> u64 {
    60
}

fn default_network_idle_ms() -> u64 {
    500
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_url: default_search_url(),
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            webdriver_url: default_webdriver_url(),
            element_timeout_secs: default_element_timeout_secs(),
            navigation_timeout_secs: default_navigation_timeout_secs(),
            network_idle_ms: default_network_idle_ms(),
            fetch_details: false,
            selectors: SiteSelectors::default(),
            detail_routes: DetailRoutes::default(),
        }
    }
}

impl CrawlerConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply the `WEBDRIVER_URL` override if one was provided
    pub fn apply_webdriver_override(&mut self, webdriver_url: Option<String>) {
        if let Some(url) = webdriver_url.filter(|u| !u.is_empty()) {
            ::log::debug!("Using WebDriver URL from environment: {}", url);
            self.webdriver_url = url;
        }
    }

    /// Check that every configured URL parses and the base URL has an origin
    pub fn validate(&self) -> Result<(), ConfigError> {
        for url in [&self.base_url, &self.search_url, &self.webdriver_url] {
            Url::parse(url).map_err(|source| ConfigError::Url {
                url: url.clone(),
                source,
            })?;
        }
        permission_origin(&self.base_url)?;
        Ok(())
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }
}
