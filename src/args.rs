use clap::{ArgAction, Parser, ValueEnum};
use job_crawler::JobSearch;
use job_crawler::error::ConfigError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "job-crawler")]
#[command(about = "Crawls every result page of a job-board search")]
#[command(version)]
pub struct Args {
    /// Keyword to search for
    pub keyword: String,

    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run the browser without a window
    #[arg(long, action = ArgAction::Set)]
    pub headless: Option<bool>,

    /// Site root, used to scope browser permissions
    #[arg(long)]
    pub base_url: Option<String>,

    /// Page carrying the search form
    #[arg(long)]
    pub search_url: Option<String>,

    /// Browser window width
    #[arg(long)]
    pub width: Option<u32>,

    /// Browser window height
    #[arg(long)]
    pub height: Option<u32>,

    /// WebDriver endpoint (WEBDRIVER_URL takes precedence)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Also visit every listing and extract its detail record
    #[arg(long)]
    pub details: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Summary,
}

impl Args {
    /// Build the search from the config file and explicit flags
    pub fn into_search(self) -> Result<JobSearch, ConfigError> {
        let mut search = JobSearch::new(self.keyword);
        if let Some(path) = &self.config {
            search = search.with_config_file(path)?;
        }

        let defaults = search.config().clone();
        search = search
            .with_headless(self.headless.unwrap_or(defaults.headless))
            .with_window_size(
                self.width.unwrap_or(defaults.window_width),
                self.height.unwrap_or(defaults.window_height),
            );
        if let Some(url) = self.base_url {
            search = search.with_base_url(url);
        }
        if let Some(url) = self.search_url {
            search = search.with_search_url(url);
        }
        if let Some(url) = self.webdriver_url {
            search = search.with_webdriver_url(url);
        }
        if self.details {
            search = search.with_details(true);
        }
        Ok(search)
    }
}
