use crate::config::CrawlerConfig;
use crate::crawlers::crawler::JobBoard;
use crate::crawlers::detail::fetch_details;
use crate::crawlers::timviec365::Timviec365;
use crate::crawlers::walker::crawl_all_jobs;
use crate::driver::{Session, goto, webdriver};
use crate::error::CrawlError;
use crate::results::CrawlResults;
use std::time::Instant;

/// Launches a browser, crawls `keyword` on timviec365 and closes the browser.
///
/// # Arguments
///
/// * `config` - Crawler configuration
/// * `keyword` - Text typed into the site's search box
pub async fn start(config: &CrawlerConfig, keyword: &str) -> Result<CrawlResults, CrawlError> {
    config.validate()?;
    let board = Timviec365::from_config(config)?;

    let session = webdriver::launch(config).await?;
    crawl(&session, &board, config, keyword).await
}

/// [`run`], then close `session` whatever the outcome
pub async fn crawl(
    session: &dyn Session,
    board: &dyn JobBoard,
    config: &CrawlerConfig,
    keyword: &str,
) -> Result<CrawlResults, CrawlError> {
    let outcome = run(session, board, config, keyword).await;

    if let Err(e) = session.close().await {
        ::log::warn!("Failed to close browser session: {}", e);
    }

    outcome
}

/// Runs one crawl on an already launched session.
///
/// Search, total page count and the page-walk are fatal on failure; detail
/// fetching, when enabled, skips listings it cannot read.
pub async fn run(
    session: &dyn Session,
    board: &dyn JobBoard,
    config: &CrawlerConfig,
    keyword: &str,
) -> Result<CrawlResults, CrawlError> {
    let started = Instant::now();
    ::log::info!(
        "{}: has just started and crawling for keyword: {} - URL: {}",
        board.name(),
        keyword,
        config.base_url
    );

    let page = goto(session, &config.search_url, None).await?;
    board.search(page.as_ref(), keyword).await.inspect_err(|e| {
        ::log::error!("{} - Fail to search: {}", board.name(), e);
    })?;

    let total_pages = board.total_pages(page.as_ref()).await.inspect_err(|e| {
        ::log::error!(
            "{} - Fail to get total page number for `{}`: {}",
            board.name(),
            keyword,
            e
        );
    })?;
    ::log::info!("Total pages for `{}`: {}", keyword, total_pages);

    let listings = crawl_all_jobs(board, page.as_ref(), Some(total_pages)).await?;

    let details = if config.fetch_details {
        fetch_details(board, page.as_ref(), &listings).await
    } else {
        Vec::new()
    };

    let elapsed = started.elapsed().as_secs_f64();
    ::log::info!("Crawling process completed in {} seconds", elapsed.round());

    Ok(CrawlResults {
        keyword: keyword.to_string(),
        total_pages,
        listings,
        details,
        elapsed_secs: elapsed,
    })
}
