//! Detail fetching. Unlike the page-walk, every listing is isolated: a
//! failure is logged and only that listing is left out.

use crate::crawlers::crawler::JobBoard;
use crate::driver::{Page, navigate};
use crate::error::DetailError;
use crate::results::{JobDetail, JobOverall};

/// Visits every listing on `page` and collects the detail records that
/// could be extracted, in listing order
pub async fn fetch_details(
    board: &dyn JobBoard,
    page: &dyn Page,
    jobs: &[JobOverall],
) -> Vec<JobDetail> {
    let mut details = Vec::with_capacity(jobs.len());

    for job in jobs {
        match fetch_detail(board, page, job).await {
            Ok(Some(detail)) => {
                ::log::info!("Job crawling completed successfully: {}", detail.url);
                ::log::debug!("{:?}", detail);
                details.push(detail);
            }
            Ok(None) => {
                ::log::debug!("No detail routine for {}, skipping", job.url);
            }
            Err(e) => {
                ::log::error!(
                    "{} - Fail to crawl job detail: {} - {}: {}",
                    board.name(),
                    job.title,
                    job.url,
                    e
                );
            }
        }
    }

    ::log::info!(
        "Fetched {} of {} job details",
        details.len(),
        jobs.len()
    );
    details
}

/// Navigates to one listing and extracts it; `None` when the URL matches
/// no known detail shape
pub async fn fetch_detail(
    board: &dyn JobBoard,
    page: &dyn Page,
    job: &JobOverall,
) -> Result<Option<JobDetail>, DetailError> {
    if job.url.is_empty() {
        return Err(DetailError::MissingUrl {
            title: job.title.clone(),
        });
    }

    navigate(page, &job.url).await?;

    match board.classify(&job.url) {
        Some(kind) => Ok(Some(board.extract_detail(page, kind, job).await?)),
        None => Ok(None),
    }
}
