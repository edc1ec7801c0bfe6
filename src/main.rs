use clap::Parser;
use job_crawler::CrawlResults;

mod args;
use args::{Args, OutputFormat};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();
    let format = args.format;

    ::log::info!("Starting crawler for keyword: {}", args.keyword);

    let search = match args.into_search() {
        Ok(search) => search,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    eprintln!("Note: crawling requires a WebDriver server (e.g., ChromeDriver).");
    eprintln!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    match search.run().await {
        Ok(results) => print_results(&results, format),
        Err(e) => {
            ::log::error!("Crawl failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_results(results: &CrawlResults, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(results) {
            Ok(json) => println!("{}", json),
            Err(e) => ::log::error!("Failed to serialize results: {}", e),
        },
        OutputFormat::Summary => {
            println!(
                "{}: {} listing(s) over {} page(s), {} detail record(s) in {:.1}s",
                results.keyword,
                results.listings.len(),
                results.total_pages,
                results.details.len(),
                results.elapsed_secs
            );
            for job in &results.listings {
                println!("  {} - {}", job.title, job.url);
            }
        }
    }
}
