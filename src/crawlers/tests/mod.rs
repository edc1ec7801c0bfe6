//! Orchestration scenarios run against the in-memory fixture driver.


use crate::config::CrawlerConfig;
use crate::crawlers::Timviec365;
use crate::driver::Page;
use crate::driver::fixture::FixtureSite;

pub const SEARCH_URL: &str = "https://timviec365.vn/";

pub fn results_url(page: u32) -> String {
    format!("https://timviec365.vn/tim-kiem?keyword=backend+developer&page={}", page)
}

pub fn job_url(page: u32, index: u32) -> String {
    format!("https://timviec365.vn/viec-lam/backend-developer-p{}{:02}.html", page, index)
}

pub fn board() -> Timviec365 {
    Timviec365::from_config(&CrawlerConfig::default()).unwrap()
}

pub fn search_page() -> String {
    r#"<html><body><form><input id="fts_id" name="keyword"></form></body></html>"#.to_string()
}

pub fn card(url: &str, title: &str) -> String {
    format!(
        r#"<div class="item_cate">
            <div class="center_cate_l">
                <h3><a class="title_cate" href="{url}" title="{title}">{title}</a></h3>
                <p class="company">ACME</p>
            </div>
        </div>"#
    )
}

/// A card whose title/link element has been removed
pub fn card_without_link() -> String {
    r#"<div class="item_cate"><div class="center_cate_l"><h3>Tin đã ẩn</h3></div></div>"#
        .to_string()
}

pub fn cards_for(page: u32, count: u32) -> Vec<String> {
    (1..=count)
        .map(|i| card(&job_url(page, i), &format!("Backend developer {}-{}", page, i)))
        .collect()
}

/// Pagination control from `(label, href, class)` triples
pub fn pagination(links: &[(&str, &str, &str)]) -> String {
    let links: String = links
        .iter()
        .map(|(label, href, class)| format!(r#"<a href="{href}" class="{class}">{label}</a>"#))
        .collect();
    format!(r#"<div class="clr">{}</div>"#, links)
}

pub fn results_page(cards: &[String], pagination: Option<String>) -> String {
    format!(
        r#"<html><body>
            <div class="main_cate">{}</div>
            {}
        </body></html>"#,
        cards.join("\n"),
        pagination.unwrap_or_default()
    )
}

/// Pagination of a three-page result set as shown on `current`.
///
/// Pages 1 and 2 end with a "next" link; page 3 ends with its own page
/// number marked `last`.
pub fn three_page_pagination(current: u32) -> String {
    let urls: Vec<String> = (1..=3).map(results_url).collect();
    let next_url = results_url(current + 1);
    let class = |page: u32| match (page == current, page == 3) {
        (true, true) => "jp-current last",
        (true, false) => "jp-current",
        _ => "",
    };

    let mut links = vec![
        ("1", urls[0].as_str(), class(1)),
        ("2", urls[1].as_str(), class(2)),
        ("3", urls[2].as_str(), class(3)),
    ];
    if current < 3 {
        links.push(("next", next_url.as_str(), ""));
    }
    pagination(&links)
}

/// Search page plus three result pages with 10, 10 and 4 listings
pub fn three_page_site() -> FixtureSite {
    FixtureSite::new()
        .page(SEARCH_URL, search_page())
        .search_lands_on(&results_url(1))
        .page(
            &results_url(1),
            results_page(&cards_for(1, 10), Some(three_page_pagination(1))),
        )
        .page(
            &results_url(2),
            results_page(&cards_for(2, 10), Some(three_page_pagination(2))),
        )
        .page(
            &results_url(3),
            results_page(&cards_for(3, 4), Some(three_page_pagination(3))),
        )
}

/// Opens a page on `site` already showing `url`
pub async fn open(site: &FixtureSite, url: &str) -> Box<dyn Page> {
    use crate::driver::Session;

    let page = site.session().new_page().await.unwrap();
    page.navigate(url).await.unwrap();
    page
}
