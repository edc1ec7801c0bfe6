use crate::config::DetailSelectors;
use crate::parsers::text::{collapse_whitespace, join_lines};
use crate::results::{Company, JobDetail, JobOverall};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Why a detail document could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailParseError {
    /// A configured selector is not valid CSS
    Selector(String),
    /// The required element is absent
    Missing(String),
}

/// Parses a detail page into a record for `job`.
///
/// Only the title element is required; every other field falls back to an
/// empty string. An empty title falls back to the listing's own title.
pub fn parse_detail(
    html: &str,
    job: &JobOverall,
    selectors: &DetailSelectors,
) -> Result<JobDetail, DetailParseError> {
    let doc = Html::parse_document(html);

    let title = first(&doc, &selectors.title)?
        .map(inline_text)
        .ok_or_else(|| DetailParseError::Missing(selectors.title.clone()))?;
    let title = if title.is_empty() {
        job.title.clone()
    } else {
        title
    };

    let description = first(&doc, &selectors.description)?
        .map(|el| join_lines(el.text()))
        .unwrap_or_default();

    let company = Company::new(
        absolute(&job.url, &attr_of(&doc, &selectors.company_link, "href")?),
        text_of(&doc, &selectors.company_name)?,
        text_of(&doc, &selectors.company_address)?,
        absolute(&job.url, &attr_of(&doc, &selectors.company_logo, "src")?),
    );

    Ok(JobDetail {
        url: job.url.clone(),
        title,
        salary: text_of(&doc, &selectors.salary)?,
        location: text_of(&doc, &selectors.location)?,
        deadline: text_of(&doc, &selectors.deadline)?,
        description,
        company,
    })
}

fn first<'a>(doc: &'a Html, css: &str) -> Result<Option<ElementRef<'a>>, DetailParseError> {
    let selector = Selector::parse(css).map_err(|_| DetailParseError::Selector(css.to_string()))?;
    Ok(doc.select(&selector).next())
}

fn inline_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

fn text_of(doc: &Html, css: &str) -> Result<String, DetailParseError> {
    Ok(first(doc, css)?.map(inline_text).unwrap_or_default())
}

fn attr_of(doc: &Html, css: &str, attr: &str) -> Result<String, DetailParseError> {
    Ok(first(doc, css)?
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default())
}

/// Resolves `href` against the page it was found on; unresolvable values
/// are kept as written
fn absolute(page_url: &str, href: &str) -> String {
    if href.is_empty() {
        return String::new();
    }
    Url::parse(page_url)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_PAGE: &str = r#"
        <html><body>
            <h1 class="title_detail">  Lập trình viên   Rust </h1>
            <div class="salary_detail"><span>20 - 30 triệu</span></div>
            <div class="location_detail"><span>Hà Nội</span></div>
            <div class="deadline_detail"><span>31/12/2026</span></div>
            <div class="box_mota">
                <p>Phát triển dịch vụ backend.</p>
                <ul><li>Viết API</li><li>Review   code</li></ul>
            </div>
            <div class="company_detail">
                <a href="/cong-ty/acme-1">ACME</a>
                <h2>Công ty ACME</h2>
                <p class="address">Cầu Giấy, Hà Nội</p>
                <img src="https://cdn.timviec365.vn/logo/acme.png">
            </div>
        </body></html>
    "#;

    fn job() -> JobOverall {
        JobOverall::new(
            "https://timviec365.vn/viec-lam/rust-p1.html".to_string(),
            "Rust developer".to_string(),
        )
    }

    #[test]
    fn test_parse_listing_detail() {
        let detail = parse_detail(DETAIL_PAGE, &job(), &DetailSelectors::default()).unwrap();

        assert_eq!(detail.url, "https://timviec365.vn/viec-lam/rust-p1.html");
        assert_eq!(detail.title, "Lập trình viên Rust");
        assert_eq!(detail.salary, "20 - 30 triệu");
        assert_eq!(detail.location, "Hà Nội");
        assert_eq!(detail.deadline, "31/12/2026");
        assert_eq!(
            detail.description,
            "Phát triển dịch vụ backend.\nViết API\nReview code"
        );
        assert_eq!(detail.company.url, "https://timviec365.vn/cong-ty/acme-1");
        assert_eq!(detail.company.name, "Công ty ACME");
        assert_eq!(detail.company.address, "Cầu Giấy, Hà Nội");
        assert_eq!(
            detail.company.image_url,
            "https://cdn.timviec365.vn/logo/acme.png"
        );
    }

    #[test]
    fn test_missing_title_is_an_error() {
        let html = "<html><body><div class='box_mota'>Mô tả</div></body></html>";
        let err = parse_detail(html, &job(), &DetailSelectors::default()).unwrap_err();
        assert_eq!(err, DetailParseError::Missing("h1.title_detail".to_string()));
    }

    #[test]
    fn test_optional_fields_degrade_to_empty() {
        let html = "<html><body><h1 class='title_detail'></h1></body></html>";
        let detail = parse_detail(html, &job(), &DetailSelectors::default()).unwrap();

        assert_eq!(detail.title, "Rust developer");
        assert_eq!(detail.salary, "");
        assert_eq!(detail.description, "");
        assert_eq!(detail.company, Company::default());
    }

    #[test]
    fn test_invalid_selector() {
        let selectors = DetailSelectors {
            salary: "div[".to_string(),
            ..DetailSelectors::default()
        };
        let err = parse_detail(DETAIL_PAGE, &job(), &selectors).unwrap_err();
        assert_eq!(err, DetailParseError::Selector("div[".to_string()));
    }

    #[test]
    fn test_parse_brand_page() {
        let html = r#"
            <html><body>
                <div class="brand_header">
                    <h1>ACME Group</h1>
                    <a class="brand_link" href="https://acme.vn">website</a>
                    <span class="brand_address">Quận 1, TP HCM</span>
                </div>
                <div class="brand_job">
                    <h2 class="job_title">Kỹ sư dữ liệu</h2>
                    <span class="job_salary">Thoả thuận</span>
                </div>
            </body></html>
        "#;
        let detail = parse_detail(html, &job(), &DetailSelectors::brand()).unwrap();

        assert_eq!(detail.title, "Kỹ sư dữ liệu");
        assert_eq!(detail.salary, "Thoả thuận");
        assert_eq!(detail.company.name, "ACME Group");
        assert_eq!(detail.company.url, "https://acme.vn/");
        assert_eq!(detail.company.address, "Quận 1, TP HCM");
        assert_eq!(detail.company.image_url, "");
    }
}
