//! WebDriver implementation of the driver boundary, built on `fantoccini`.

use super::{Element, Page, Session};
use crate::config::CrawlerConfig;
use crate::error::{ConfigError, DriverError, LaunchError};
use crate::utils::permission_origin;
use async_trait::async_trait;
use fantoccini::elements::Element as WebElement;
use fantoccini::error::{CmdError, NewSessionError};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::time::{Duration, Instant};
use tokio::time::{sleep, timeout_at};

/// Permissions granted to the site for the whole session
const GRANTED_PERMISSIONS: [&str; 2] = ["geolocation", "notifications"];

/// Reports the document state and the number of resource loads finished
/// since the document was created. The timing buffer holds 250 entries by
/// default, so it is drained into a running count on every probe.
const IDLE_PROBE_SCRIPT: &str = "\
    const finished = performance.getEntriesByType('resource').length;\
    performance.clearResourceTimings();\
    window.__jobCrawlerLoads = (window.__jobCrawlerLoads || 0) + finished;\
    return [document.readyState, window.__jobCrawlerLoads];";

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

impl From<CmdError> for DriverError {
    fn from(error: CmdError) -> Self {
        DriverError::Command(error.to_string())
    }
}

/// Timing knobs shared by every page of a session
#[derive(Debug, Clone, Copy)]
struct IdlePolicy {
    window: Duration,
    limit: Duration,
}

/// A WebDriver session
pub struct WebDriverSession {
    client: Client,
    idle: IdlePolicy,
}

/// Launches a browser session through the configured WebDriver server
pub async fn launch(config: &CrawlerConfig) -> Result<WebDriverSession, LaunchError> {
    let capabilities = chrome_capabilities(config)?;

    let client = connect_to_webdriver(&config.webdriver_url, &capabilities).await?;
    ::log::info!("Opening browser");

    Ok(WebDriverSession {
        client,
        idle: IdlePolicy {
            window: config.network_idle(),
            limit: config.navigation_timeout(),
        },
    })
}

/// Builds Chrome capabilities: window size, headless mode and per-origin
/// content settings for the granted permissions.
pub fn chrome_capabilities(config: &CrawlerConfig) -> Result<Map<String, Value>, ConfigError> {
    let origin = permission_origin(&config.base_url)?;

    let mut args = vec![format!(
        "--window-size={},{}",
        config.window_width, config.window_height
    )];
    if config.headless {
        args.push("--headless=new".to_string());
    }

    let mut prefs = Map::new();
    for permission in GRANTED_PERMISSIONS {
        let mut exceptions = Map::new();
        exceptions.insert(format!("{},*", origin), json!({ "setting": 1 }));
        prefs.insert(
            format!("profile.content_settings.exceptions.{}", permission),
            Value::Object(exceptions),
        );
    }

    let mut capabilities = Map::new();
    capabilities.insert("browserName".to_string(), json!("chrome"));
    capabilities.insert(
        "goog:chromeOptions".to_string(),
        json!({ "args": args, "prefs": prefs }),
    );
    Ok(capabilities)
}

/// Connects to the WebDriver instance, trying common local endpoints if the
/// configured one is not answering
async fn connect_to_webdriver(
    webdriver_url: &str,
    capabilities: &Map<String, Value>,
) -> Result<Client, LaunchError> {
    let first_error = match try_connect(webdriver_url, capabilities).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e
        }
    };

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://127.0.0.1:4444",
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = try_connect(url, capabilities).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(LaunchError::Connect {
        webdriver_url: webdriver_url.to_string(),
        source: first_error,
    })
}

async fn try_connect(
    url: &str,
    capabilities: &Map<String, Value>,
) -> Result<Client, NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    builder.connect(url).await
}

#[async_trait]
impl Session for WebDriverSession {
    /// WebDriver sessions drive a single window, so every page shares it
    async fn new_page(&self) -> Result<Box<dyn Page>, DriverError> {
        Ok(Box::new(WebDriverPage {
            client: self.client.clone(),
            idle: self.idle,
        }))
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.client.clone().close().await?;
        Ok(())
    }
}

pub struct WebDriverPage {
    client: Client,
    idle: IdlePolicy,
}

/// What one idle probe concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdleProbe {
    Settled,
    Pending,
    Expired,
}

/// Tracks idle probes against a single deadline for the whole navigation
#[derive(Debug)]
struct IdleTracker {
    deadline: Instant,
    window: Duration,
    last_count: Option<u64>,
    stable_since: Instant,
}

impl IdleTracker {
    fn new(deadline: Instant, window: Duration, now: Instant) -> Self {
        Self {
            deadline,
            window,
            last_count: None,
            stable_since: now,
        }
    }

    fn observe(&mut self, complete: bool, count: Option<u64>, now: Instant) -> IdleProbe {
        if complete && count.is_some() && count == self.last_count {
            if now.duration_since(self.stable_since) >= self.window {
                return IdleProbe::Settled;
            }
        } else {
            self.last_count = count;
            self.stable_since = now;
        }

        if now >= self.deadline {
            IdleProbe::Expired
        } else {
            IdleProbe::Pending
        }
    }
}

impl WebDriverPage {
    /// Polls until the document is complete and no resource load has
    /// finished for a full idle window, giving up at `deadline`
    async fn wait_for_network_idle(&self, deadline: Instant) -> Result<(), DriverError> {
        let started = Instant::now();
        let mut tracker = IdleTracker::new(deadline, self.idle.window, started);

        loop {
            let probe = self.client.execute(IDLE_PROBE_SCRIPT, Vec::new()).await?;
            let complete = probe[0].as_str() == Some("complete");

            match tracker.observe(complete, probe[1].as_u64(), Instant::now()) {
                IdleProbe::Settled => {
                    ::log::trace!(
                        "Network idle after {:.2}s",
                        started.elapsed().as_secs_f64()
                    );
                    return Ok(());
                }
                IdleProbe::Expired => {
                    return Err(DriverError::NotIdle {
                        secs: self.idle.limit.as_secs(),
                    });
                }
                IdleProbe::Pending => sleep(IDLE_POLL_INTERVAL).await,
            }
        }
    }
}

fn wrap(elements: Vec<WebElement>) -> Vec<Box<dyn Element>> {
    elements
        .into_iter()
        .map(|element| Box::new(WebDriverElement { element }) as Box<dyn Element>)
        .collect()
}

#[async_trait]
impl Page for WebDriverPage {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let deadline = Instant::now() + self.idle.limit;
        match timeout_at(deadline.into(), self.client.goto(url)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(DriverError::NotIdle {
                    secs: self.idle.limit.as_secs(),
                });
            }
        }
        self.wait_for_network_idle(deadline).await
    }

    async fn wait_until_idle(&self) -> Result<(), DriverError> {
        self.wait_for_network_idle(Instant::now() + self.idle.limit)
            .await
    }

    async fn wait_for(&self, css: &str, limit: Duration) -> Result<Box<dyn Element>, DriverError> {
        let element = self
            .client
            .wait()
            .at_most(limit)
            .for_element(Locator::Css(css))
            .await
            .map_err(|e| match e {
                CmdError::WaitTimeout => DriverError::Timeout {
                    selector: css.to_string(),
                },
                other => other.into(),
            })?;
        Ok(Box::new(WebDriverElement { element }))
    }

    async fn find(&self, css: &str) -> Result<Option<Box<dyn Element>>, DriverError> {
        Ok(self.find_all(css).await?.into_iter().next())
    }

    async fn find_all(&self, css: &str) -> Result<Vec<Box<dyn Element>>, DriverError> {
        Ok(wrap(self.client.find_all(Locator::Css(css)).await?))
    }

    async fn source(&self) -> Result<String, DriverError> {
        Ok(self.client.source().await?)
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.client.current_url().await?.to_string())
    }
}

pub struct WebDriverElement {
    element: WebElement,
}

#[async_trait]
impl Element for WebDriverElement {
    async fn text(&self) -> Result<String, DriverError> {
        Ok(self.element.text().await?.trim().to_string())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, DriverError> {
        Ok(self.element.attr(name).await?)
    }

    async fn find(&self, css: &str) -> Result<Option<Box<dyn Element>>, DriverError> {
        Ok(self.find_all(css).await?.into_iter().next())
    }

    async fn find_all(&self, css: &str) -> Result<Vec<Box<dyn Element>>, DriverError> {
        Ok(wrap(self.element.find_all(Locator::Css(css)).await?))
    }

    async fn send_keys(&self, text: &str) -> Result<(), DriverError> {
        Ok(self.element.send_keys(text).await?)
    }

    async fn click(&self) -> Result<(), DriverError> {
        Ok(self.element.click().await?)
    }
}
