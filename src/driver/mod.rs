//! Browser driver boundary.
//!
//! The crawl only needs a small capability set from a browser: open a page,
//! navigate it, wait for and query elements, read text and attributes, type
//! and click. Anything implementing [`Session`], [`Page`] and [`Element`] can
//! drive a crawl; [`webdriver`] is the implementation used by the binary.

pub mod webdriver;

#[cfg(test)]
pub(crate) mod fixture;

use crate::error::{DriverError, NavigationError};
use async_trait::async_trait;
use std::time::Duration;

/// WebDriver code point for the Enter key.
pub const ENTER_KEY: &str = "\u{e007}";

/// An element handle on the current page.
#[async_trait]
pub trait Element: Send + Sync {
    /// Rendered text of the element, trimmed
    async fn text(&self) -> Result<String, DriverError>;

    async fn attr(&self, name: &str) -> Result<Option<String>, DriverError>;

    /// First descendant matching `css`, if any
    async fn find(&self, css: &str) -> Result<Option<Box<dyn Element>>, DriverError>;

    async fn find_all(&self, css: &str) -> Result<Vec<Box<dyn Element>>, DriverError>;

    async fn send_keys(&self, text: &str) -> Result<(), DriverError>;

    async fn click(&self) -> Result<(), DriverError>;
}

/// A live page. Navigation replaces its document in place.
#[async_trait]
pub trait Page: Send + Sync {
    /// Load `url` and wait until the network is idle
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Wait for an in-place navigation (form submit, link click) to settle
    async fn wait_until_idle(&self) -> Result<(), DriverError>;

    /// Wait at most `timeout` for an element matching `css`
    async fn wait_for(&self, css: &str, timeout: Duration) -> Result<Box<dyn Element>, DriverError>;

    async fn find(&self, css: &str) -> Result<Option<Box<dyn Element>>, DriverError>;

    async fn find_all(&self, css: &str) -> Result<Vec<Box<dyn Element>>, DriverError>;

    /// Serialized DOM of the current document
    async fn source(&self) -> Result<String, DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;
}

/// A browser session owning the page(s) of one crawl.
#[async_trait]
pub trait Session: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn Page>, DriverError>;

    async fn close(&self) -> Result<(), DriverError>;
}

/// Navigate `page` to `url`, or a freshly opened page when none is given.
pub async fn goto(
    session: &dyn Session,
    url: &str,
    page: Option<Box<dyn Page>>,
) -> Result<Box<dyn Page>, NavigationError> {
    let page = match page {
        Some(page) => page,
        None => session.new_page().await.map_err(|source| NavigationError {
            url: url.to_string(),
            source,
        })?,
    };

    navigate(page.as_ref(), url).await?;
    Ok(page)
}

/// Navigate an existing page to `url`.
pub async fn navigate(page: &dyn Page, url: &str) -> Result<(), NavigationError> {
    match page.navigate(url).await {
        Ok(()) => {
            ::log::info!("Go to page: {}", url);
            Ok(())
        }
        Err(source) => {
            ::log::error!("Failed to go to page {}: {}", url, source);
            Err(NavigationError {
                url: url.to_string(),
                source,
            })
        }
    }
}
