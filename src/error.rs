use thiserror::Error;

/// Failure reported by a browser driver implementation.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("webdriver command failed: {0}")]
    Command(String),

    #[error("timed out waiting for `{selector}`")]
    Timeout { selector: String },

    #[error("page did not settle within {secs}s")]
    NotIdle { secs: u64 },

    #[error("invalid selector: {0}")]
    Selector(String),
}

/// Configuration could not be loaded or is internally inconsistent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid detail route pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid url `{url}`: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("url `{url}` has no origin to grant permissions to")]
    OpaqueOrigin { url: String },
}

/// The browser session could not be started.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("cannot build browser capabilities: {0}")]
    Capabilities(#[from] ConfigError),

    #[error("failed to launch browser session via {webdriver_url}: {source}")]
    Connect {
        webdriver_url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },
}

#[derive(Debug, Error)]
#[error("failed to go to page {url}")]
pub struct NavigationError {
    pub url: String,
    #[source]
    pub source: DriverError,
}

#[derive(Debug, Error)]
#[error("failed to search for `{keyword}`")]
pub struct SearchError {
    pub keyword: String,
    #[source]
    pub source: DriverError,
}

/// The pagination markup no longer matches what the inspector expects.
#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("pagination label `{label}` is not a page number")]
    Parse { label: String },

    #[error("pagination control has no last link")]
    NoNextLink,

    #[error(transparent)]
    Driver(#[from] DriverError),
}

#[derive(Debug, Error)]
#[error("failed to extract listings: {source}")]
pub struct ExtractError {
    #[from]
    pub source: DriverError,
}

/// The step of the page-walk that failed.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("failed to advance to the next page: {0}")]
    Advance(#[source] DriverError),
}

/// The page-walk aborted; listings gathered before the failure are dropped.
#[derive(Debug, Error)]
#[error("failed to crawl all jobs after {pages_walked} page(s) (last page: {})", .page_label.as_deref().unwrap_or("_"))]
pub struct CrawlAllJobsError {
    pub pages_walked: u32,
    pub page_label: Option<String>,
    #[source]
    pub cause: WalkError,
}

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("listing `{title}` has no url")]
    MissingUrl { title: String },

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("detail page {url} has no element matching `{selector}`")]
    MissingContent { url: String, selector: String },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Any failure that ends a crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error(transparent)]
    CrawlAllJobs(#[from] CrawlAllJobsError),
}
