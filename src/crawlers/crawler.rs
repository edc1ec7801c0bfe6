use crate::config::{DetailSelectors, SiteSelectors};
use crate::crawlers::pagination::{last_page_from_labels, marks_end_of_results};
use crate::driver::{ENTER_KEY, Element, Page};
use crate::error::{DetailError, DriverError, ExtractError, PaginationError, SearchError};
use crate::parsers::{self, DetailParseError};
use crate::results::{JobDetail, JobOverall};
use crate::routes::DetailKind;
use async_trait::async_trait;
use futures::future::try_join_all;
use std::time::Duration;

/// A job board the crawler knows how to drive.
///
/// Every operation has a default implementation driven by the board's
/// selector table, so a new site usually only supplies [`selectors`],
/// [`classify`] and its timings. Sites whose markup does not fit the
/// defaults override individual steps.
///
/// [`selectors`]: JobBoard::selectors
/// [`classify`]: JobBoard::classify
#[async_trait]
pub trait JobBoard: Send + Sync {
    /// Name used in log messages
    fn name(&self) -> &str;

    fn selectors(&self) -> &SiteSelectors;

    /// Upper bound for waits on a single element
    fn element_timeout(&self) -> Duration;

    /// Detail routine for a listing URL, `None` when the URL is not supported
    fn classify(&self, url: &str) -> Option<DetailKind>;

    fn detail_selectors(&self, kind: DetailKind) -> &DetailSelectors {
        match kind {
            DetailKind::Listing => &self.selectors().listing_detail,
            DetailKind::Brand => &self.selectors().brand_detail,
        }
    }

    /// Types `keyword` into the search input and submits it
    async fn search(&self, page: &dyn Page, keyword: &str) -> Result<(), SearchError> {
        let wrap = |source: DriverError| SearchError {
            keyword: keyword.to_string(),
            source,
        };

        let input = page
            .wait_for(&self.selectors().search_input, self.element_timeout())
            .await
            .map_err(wrap)?;
        input.send_keys(keyword).await.map_err(wrap)?;
        input.send_keys(ENTER_KEY).await.map_err(wrap)?;
        page.wait_until_idle().await.map_err(wrap)?;

        let results_url = page.current_url().await.map_err(wrap)?;
        ::log::info!("Searching: {} - {}", keyword, results_url);
        Ok(())
    }

    /// Whether the results container exists at all
    async fn has_results(&self, page: &dyn Page) -> Result<bool, ExtractError> {
        Ok(page.find(&self.selectors().results_container).await?.is_some())
    }

    /// The pagination control, `None` for single-page result sets
    async fn pagination(&self, page: &dyn Page) -> Result<Option<Box<dyn Element>>, PaginationError> {
        Ok(page.find(&self.selectors().pagination).await?)
    }

    /// Number of result pages; 1 when there is no pagination control
    async fn total_pages(&self, page: &dyn Page) -> Result<u32, PaginationError> {
        let Some(pagination) = self.pagination(page).await? else {
            return Ok(1);
        };

        let links = pagination.find_all(&self.selectors().pagination_link).await?;
        let labels = try_join_all(links.iter().map(|link| link.text())).await?;
        last_page_from_labels(&labels)
    }

    async fn current_page_label(
        &self,
        pagination: &dyn Element,
    ) -> Result<Option<String>, PaginationError> {
        match pagination.find(&self.selectors().current_page).await? {
            Some(current) => Ok(Some(current.text().await?)),
            None => Ok(None),
        }
    }

    /// The link that advances to the next page, `None` on the last page
    async fn next_page_link(
        &self,
        pagination: &dyn Element,
    ) -> Result<Option<Box<dyn Element>>, PaginationError> {
        let last = pagination
            .find_all(&self.selectors().pagination_link)
            .await?
            .pop()
            .ok_or(PaginationError::NoNextLink)?;

        let class = last.attr("class").await?;
        if marks_end_of_results(class.as_deref(), &self.selectors().end_markers) {
            Ok(None)
        } else {
            Ok(Some(last))
        }
    }

    /// Reads every listing card on the current page, in card order
    async fn extract_listings(&self, page: &dyn Page) -> Result<Vec<JobOverall>, ExtractError> {
        if !self.has_results(page).await? {
            ::log::info!("There's no result that matches the keyword");
            return Ok(Vec::new());
        }

        let selectors = self.selectors();
        let cards = page.find_all(&selectors.listing_card).await?;
        ::log::info!("Found {} listing cards", cards.len());

        let jobs = try_join_all(cards.iter().map(|card| read_card(card.as_ref(), selectors))).await?;
        for job in &jobs {
            ::log::debug!("Listing: {:?}", job);
        }
        Ok(jobs)
    }

    /// Extracts a detail record from the page currently showing `job`
    async fn extract_detail(
        &self,
        page: &dyn Page,
        kind: DetailKind,
        job: &JobOverall,
    ) -> Result<JobDetail, DetailError> {
        let html = page.source().await?;
        parsers::parse_detail(&html, job, self.detail_selectors(kind)).map_err(|e| match e {
            DetailParseError::Selector(css) => DriverError::Selector(css).into(),
            DetailParseError::Missing(selector) => DetailError::MissingContent {
                url: job.url.clone(),
                selector,
            },
        })
    }
}

/// One card degrades to an empty record when its link element is missing
async fn read_card(card: &dyn Element, selectors: &SiteSelectors) -> Result<JobOverall, DriverError> {
    let Some(link) = card.find(&selectors.listing_link).await? else {
        ::log::warn!("Listing card without `{}`", selectors.listing_link);
        return Ok(JobOverall::default());
    };

    let url = link.attr("href").await?.unwrap_or_default();
    let title = link
        .attr(&selectors.listing_title_attr)
        .await?
        .unwrap_or_default();
    Ok(JobOverall::new(url, title))
}
