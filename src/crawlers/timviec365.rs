use crate::config::{CrawlerConfig, SiteSelectors};
use crate::crawlers::crawler::JobBoard;
use crate::error::ConfigError;
use crate::routes::{DetailKind, DetailRouter};
use async_trait::async_trait;
use std::time::Duration;

/// timviec365.vn
pub struct Timviec365 {
    selectors: SiteSelectors,
    router: DetailRouter,
    element_timeout: Duration,
}

impl Timviec365 {
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            selectors: config.selectors.clone(),
            router: DetailRouter::new(&config.detail_routes)?,
            element_timeout: config.element_timeout(),
        })
    }
}

#[async_trait]
impl JobBoard for Timviec365 {
    fn name(&self) -> &str {
        "Timviec365 Crawler"
    }

    fn selectors(&self) -> &SiteSelectors {
        &self.selectors
    }

    fn element_timeout(&self) -> Duration {
        self.element_timeout
    }

    fn classify(&self, url: &str) -> Option<DetailKind> {
        self.router.classify(url)
    }
}
