//! The page-walk: extract the current page, decide whether a next page
//! exists, advance in place, repeat.
//!
//! Walking is all-or-nothing. Any failure aborts the walk, drops the
//! listings gathered so far and surfaces as a single [`CrawlAllJobsError`].

use crate::crawlers::crawler::JobBoard;
use crate::crawlers::pagination::PaginationState;
use crate::driver::{Element, Page};
use crate::error::{CrawlAllJobsError, WalkError};
use crate::results::JobOverall;
use crate::utils::alert;

/// Outcome of a completed walk
#[derive(Debug, Default)]
pub struct WalkSummary {
    pub listings: Vec<JobOverall>,
    pub pages_walked: u32,
}

enum WalkState {
    Walking,
    /// Extraction done; holds the pagination control of the walked page
    NextPageRequested(Option<Box<dyn Element>>),
    Advancing(Box<dyn Element>),
    Done,
}

impl WalkState {
    fn name(&self) -> &'static str {
        match self {
            WalkState::Walking => "Walking",
            WalkState::NextPageRequested(_) => "NextPageRequested",
            WalkState::Advancing(_) => "Advancing",
            WalkState::Done => "Done",
        }
    }
}

/// Walks every result page reachable from `page`
pub struct PageWalker<'a> {
    board: &'a dyn JobBoard,
    page: &'a dyn Page,
    state: PaginationState,
    pages_walked: u32,
}

impl<'a> PageWalker<'a> {
    pub fn new(board: &'a dyn JobBoard, page: &'a dyn Page, total_pages: Option<u32>) -> Self {
        Self {
            board,
            page,
            state: PaginationState {
                total_pages,
                ..PaginationState::default()
            },
            pages_walked: 0,
        }
    }

    pub async fn walk(mut self) -> Result<WalkSummary, CrawlAllJobsError> {
        match self.run().await {
            Ok(listings) => Ok(WalkSummary {
                listings,
                pages_walked: self.pages_walked,
            }),
            Err(cause) => {
                alert(&format!(
                    "{} - Fail to crawl all jobs on page {}: {}",
                    self.board.name(),
                    self.state.current_page_label.as_deref().unwrap_or("_"),
                    cause
                ));
                Err(CrawlAllJobsError {
                    pages_walked: self.pages_walked,
                    page_label: self.state.current_page_label,
                    cause,
                })
            }
        }
    }

    async fn run(&mut self) -> Result<Vec<JobOverall>, WalkError> {
        if !self.board.has_results(self.page).await? {
            ::log::info!(
                "{} - There's no result that matches the keyword",
                self.board.name()
            );
            return Ok(Vec::new());
        }

        let mut listings = Vec::new();
        let mut state = WalkState::Walking;

        loop {
            ::log::trace!("Page-walk state: {}", state.name());
            state = match state {
                WalkState::Walking => {
                    let pagination = self.board.pagination(self.page).await?;
                    self.inspect(pagination.as_deref()).await?;
                    ::log::info!("Page: {} processing...", self.state.progress());

                    let jobs = self.board.extract_listings(self.page).await?;
                    ::log::info!(
                        "Page {} - Total: {} jobs",
                        self.state.current_page_label.as_deref().unwrap_or("1"),
                        jobs.len()
                    );
                    listings.extend(jobs);
                    self.pages_walked += 1;

                    WalkState::NextPageRequested(pagination)
                }
                WalkState::NextPageRequested(None) => {
                    ::log::info!("Page: 1 (no pagination) was the only page");
                    self.state.has_next_page = false;
                    WalkState::Done
                }
                WalkState::NextPageRequested(Some(pagination)) => {
                    let next = self.board.next_page_link(pagination.as_ref()).await?;
                    self.state.has_next_page = next.is_some();
                    match next {
                        Some(link) => WalkState::Advancing(link),
                        None => WalkState::Done,
                    }
                }
                WalkState::Advancing(link) => {
                    link.click().await.map_err(WalkError::Advance)?;
                    self.page
                        .wait_until_idle()
                        .await
                        .map_err(WalkError::Advance)?;
                    WalkState::Walking
                }
                WalkState::Done => return Ok(listings),
            };
        }
    }

    /// Refresh the pagination state for the page about to be extracted
    async fn inspect(&mut self, pagination: Option<&dyn Element>) -> Result<(), WalkError> {
        self.state.current_page_label = match pagination {
            Some(control) => self.board.current_page_label(control).await?,
            None => None,
        };
        self.state.has_next_page = false;
        Ok(())
    }
}

/// Walks all result pages and returns every listing in page order
pub async fn crawl_all_jobs(
    board: &dyn JobBoard,
    page: &dyn Page,
    total_pages: Option<u32>,
) -> Result<Vec<JobOverall>, CrawlAllJobsError> {
    PageWalker::new(board, page, total_pages)
        .walk()
        .await
        .map(|summary| summary.listings)
}
