use serde::{Deserialize, Serialize};

/// Employer profile embedded in a job detail record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub url: String,
    pub name: String,
    pub address: String,
    pub image_url: String,
}

impl Company {
    pub fn new(url: String, name: String, address: String, image_url: String) -> Self {
        Self {
            url,
            name,
            address,
            image_url,
        }
    }

    /// Name used for matching companies across listings.
    ///
    /// Currently the raw name; reserved for future normalization.
    pub fn normalized_name(&self) -> &str {
        &self.name
    }
}

/// Listing summary scraped from one card of a results page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOverall {
    /// Permalink of the listing (empty when the card had no link)
    pub url: String,

    /// Listing title (empty when the card had no link)
    pub title: String,
}

impl JobOverall {
    pub fn new(url: String, title: String) -> Self {
        Self { url, title }
    }
}

/// Full record read from a listing's own page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    pub url: String,
    pub title: String,
    pub salary: String,
    pub location: String,
    pub deadline: String,
    pub description: String,
    pub company: Company,
}

/// Everything a crawl for one keyword produced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResults {
    pub keyword: String,

    /// Page count reported by the pagination control on the first page
    pub total_pages: u32,

    /// Listing summaries in page-visitation order
    pub listings: Vec<JobOverall>,

    /// Detail records; empty unless detail fetching is enabled
    pub details: Vec<JobDetail>,

    pub elapsed_secs: f64,
}
