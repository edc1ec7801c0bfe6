//! In-memory driver serving static HTML documents, for tests.
//!
//! Links navigate by their `href`, pressing Enter in any input lands on the
//! configured search target, and documents registered as broken fail every
//! read while they are loaded. A single selector can be broken on one
//! document to fail just the queries that use it.

use super::{ENTER_KEY, Element, Page, Session};
use crate::error::DriverError;
use crate::parsers::text::collapse_whitespace;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

struct Doc {
    html: String,
    broken: bool,
    broken_selectors: Vec<String>,
}

#[derive(Default)]
struct State {
    docs: HashMap<String, Doc>,
    search_target: Option<String>,
    current: Option<String>,
    closed: bool,
    navigations: Vec<String>,
    queries: Vec<String>,
    typed: String,
    clicks: usize,
}

/// A scripted site; cheap to clone, all clones share state
#[derive(Clone, Default)]
pub struct FixtureSite {
    state: Arc<Mutex<State>>,
}

impl FixtureSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, html: impl Into<String>) -> Self {
        self.insert(url, html.into(), false)
    }

    /// A document that loads fine but fails every read
    pub fn broken_page(self, url: &str, html: impl Into<String>) -> Self {
        self.insert(url, html.into(), true)
    }

    /// Queries for `css` on the already registered `url` fail; every other
    /// read on that document succeeds
    pub fn broken_selector(self, url: &str, css: &str) -> Self {
        self.lock()
            .docs
            .get_mut(url)
            .expect("register the page before breaking a selector on it")
            .broken_selectors
            .push(css.to_string());
        self
    }

    /// Where pressing Enter in an input navigates to
    pub fn search_lands_on(self, url: &str) -> Self {
        self.lock().search_target = Some(url.to_string());
        self
    }

    pub fn session(&self) -> FixtureSession {
        FixtureSession { site: self.clone() }
    }

    /// Every URL loaded so far, including clicks and form submits
    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    /// Every CSS selector queried so far
    pub fn queries(&self) -> Vec<String> {
        self.lock().queries.clone()
    }

    pub fn typed(&self) -> String {
        self.lock().typed.clone()
    }

    pub fn clicks(&self) -> usize {
        self.lock().clicks
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn insert(self, url: &str, html: String, broken: bool) -> Self {
        self.lock().docs.insert(
            url.to_string(),
            Doc {
                html,
                broken,
                broken_selectors: Vec::new(),
            },
        );
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn visit(&self, url: &str) -> Result<(), DriverError> {
        let mut state = self.lock();
        if state.closed {
            return Err(DriverError::Command("session is closed".to_string()));
        }
        if !state.docs.contains_key(url) {
            return Err(DriverError::Command(format!(
                "net::ERR_NAME_NOT_RESOLVED at {}",
                url
            )));
        }
        state.current = Some(url.to_string());
        state.navigations.push(url.to_string());
        Ok(())
    }

    /// HTML of the loaded document, recording the query
    fn read(&self, css: Option<&str>) -> Result<String, DriverError> {
        let mut state = self.lock();
        if let Some(css) = css {
            state.queries.push(css.to_string());
        }
        let url = state
            .current
            .clone()
            .ok_or_else(|| DriverError::Command("no document loaded".to_string()))?;
        let doc = &state.docs[&url];
        if doc.broken {
            return Err(DriverError::Command(format!("read failed on {}", url)));
        }
        if let Some(css) = css.filter(|css| doc.broken_selectors.iter().any(|b| b == css)) {
            return Err(DriverError::Command(format!(
                "query `{}` failed on {}",
                css, url
            )));
        }
        Ok(doc.html.clone())
    }

    fn elements(&self, html: &str, css: &str, fragment: bool) -> Result<Vec<Box<dyn Element>>, DriverError> {
        Ok(select(html, css, fragment)?
            .into_iter()
            .map(|snapshot| {
                Box::new(FixtureElement {
                    site: self.clone(),
                    snapshot,
                }) as Box<dyn Element>
            })
            .collect())
    }
}

/// Element data captured at query time
struct Snapshot {
    attrs: HashMap<String, String>,
    text: String,
    inner_html: String,
}

fn select(html: &str, css: &str, fragment: bool) -> Result<Vec<Snapshot>, DriverError> {
    let selector = Selector::parse(css).map_err(|_| DriverError::Selector(css.to_string()))?;
    let doc = if fragment {
        Html::parse_fragment(html)
    } else {
        Html::parse_document(html)
    };
    Ok(doc.select(&selector).map(snapshot).collect())
}

fn snapshot(el: ElementRef<'_>) -> Snapshot {
    Snapshot {
        attrs: el
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        text: collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")),
        inner_html: el.inner_html(),
    }
}

pub struct FixtureSession {
    site: FixtureSite,
}

#[async_trait]
impl Session for FixtureSession {
    async fn new_page(&self) -> Result<Box<dyn Page>, DriverError> {
        Ok(Box::new(FixturePage {
            site: self.site.clone(),
        }))
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.site.lock().closed = true;
        Ok(())
    }
}

pub struct FixturePage {
    site: FixtureSite,
}

#[async_trait]
impl Page for FixturePage {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.site.visit(url)
    }

    async fn wait_until_idle(&self) -> Result<(), DriverError> {
        Ok(())
    }

    async fn wait_for(&self, css: &str, _timeout: Duration) -> Result<Box<dyn Element>, DriverError> {
        self.find(css).await?.ok_or_else(|| DriverError::Timeout {
            selector: css.to_string(),
        })
    }

    async fn find(&self, css: &str) -> Result<Option<Box<dyn Element>>, DriverError> {
        Ok(self.find_all(css).await?.into_iter().next())
    }

    async fn find_all(&self, css: &str) -> Result<Vec<Box<dyn Element>>, DriverError> {
        let html = self.site.read(Some(css))?;
        self.site.elements(&html, css, false)
    }

    async fn source(&self) -> Result<String, DriverError> {
        self.site.read(None)
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.site.lock().current.clone().unwrap_or_default())
    }
}

struct FixtureElement {
    site: FixtureSite,
    snapshot: Snapshot,
}

#[async_trait]
impl Element for FixtureElement {
    async fn text(&self) -> Result<String, DriverError> {
        self.site.read(None)?;
        Ok(self.snapshot.text.clone())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, DriverError> {
        self.site.read(None)?;
        Ok(self.snapshot.attrs.get(name).cloned())
    }

    async fn find(&self, css: &str) -> Result<Option<Box<dyn Element>>, DriverError> {
        Ok(self.find_all(css).await?.into_iter().next())
    }

    async fn find_all(&self, css: &str) -> Result<Vec<Box<dyn Element>>, DriverError> {
        self.site.read(Some(css))?;
        self.site.elements(&self.snapshot.inner_html, css, true)
    }

    async fn send_keys(&self, text: &str) -> Result<(), DriverError> {
        if text == ENTER_KEY {
            let target = self.site.lock().search_target.clone();
            return match target {
                Some(url) => self.site.visit(&url),
                None => Ok(()),
            };
        }
        self.site.lock().typed.push_str(text);
        Ok(())
    }

    async fn click(&self) -> Result<(), DriverError> {
        self.site.lock().clicks += 1;
        match self.snapshot.attrs.get("href") {
            Some(href) => self.site.visit(href),
            None => Ok(()),
        }
    }
}
