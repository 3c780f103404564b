//! `crawl-page` - fetch every document linked from one HTML page
//!
//! The manifest-less variant: downloads the page, extracts anchors that
//! point at documents, and feeds them through the same fetch engine and
//! summary pipeline as the manifest run.

use std::env;
use std::path::PathBuf;
use std::process;

use document_fetcher_pro::core::config::FetcherConfig;
use document_fetcher_pro::core::fetcher::BulkFetcher;
use document_fetcher_pro::core::links;
use document_fetcher_pro::utils::validation::{is_fetchable_url, validate_url};
use tracing::{error, info};

const DEFAULT_OUTPUT: &str = "downloaded_results";
const DEFAULT_CATEGORY: &str = "results";

fn print_usage() {
    eprintln!("Usage: crawl-page <page-url> [output-dir] [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("      --category <name>  Destination subfolder (default: {DEFAULT_CATEGORY})");
    eprintln!("      --delay-ms <n>     Spacing between requests in ms (default: 500)");
    eprintln!("      --insecure         Disable TLS certificate verification");
    eprintln!("  -h, --help             Show this help");
}

struct CliArgs {
    page_url: String,
    output: PathBuf,
    category: String,
    delay_ms: u64,
    insecure: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let defaults = FetcherConfig::default();
    let mut page_url = None;
    let mut output = None;
    let mut category = DEFAULT_CATEGORY.to_string();
    let mut delay_ms = defaults.request_delay_ms;
    let mut insecure = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--category" => {
                category = args.next().ok_or("--category expects a value")?;
            }
            "--delay-ms" => {
                delay_ms = args
                    .next()
                    .ok_or("--delay-ms expects a value")?
                    .parse()
                    .map_err(|_| "--delay-ms expects an integer".to_string())?;
            }
            "--insecure" => insecure = true,
            "-h" | "--help" => return Err(String::new()),
            flag if flag.starts_with('-') => return Err(format!("Unknown option: {flag}")),
            positional if page_url.is_none() => page_url = Some(positional.to_string()),
            positional if output.is_none() => output = Some(PathBuf::from(positional)),
            other => return Err(format!("Unexpected argument: {other}")),
        }
    }

    Ok(CliArgs {
        page_url: page_url.ok_or("Missing required <page-url> argument")?,
        output: output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        category,
        delay_ms,
        insecure,
    })
}

#[tokio::main]
async fn main() {
    document_fetcher_pro::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("{message}");
            }
            print_usage();
            process::exit(if message.is_empty() { 0 } else { 2 });
        }
    };

    if !is_fetchable_url(&args.page_url) {
        eprintln!("Not an http(s) URL: {}", args.page_url);
        process::exit(2);
    }
    let base_url = match validate_url(&args.page_url) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };

    let config = FetcherConfig {
        request_delay_ms: args.delay_ms,
        accept_invalid_certs: args.insecure,
        ..FetcherConfig::default()
    };

    let fetcher = match BulkFetcher::new(config) {
        Ok(fetcher) => fetcher.for_crawled_pages(),
        Err(e) => {
            error!("Cannot start: {e}");
            process::exit(1);
        }
    };

    let page = match fetcher.fetch_page(&args.page_url).await {
        Ok(page) => page,
        Err(e) => {
            error!("Could not fetch page {}: {e}", args.page_url);
            process::exit(1);
        }
    };

    let tasks = links::extract_tasks(&page, &base_url, &args.category);
    info!("Found {} document link(s) on {}", tasks.len(), args.page_url);

    match fetcher.run(&args.output, tasks).await {
        Ok(summary) => {
            summary.print_report();
            match summary.persist(&args.output) {
                Ok(path) => info!("Summary written to {}", path.display()),
                Err(e) => error!("Run completed but summary could not be written: {e}"),
            }
        }
        Err(e) => {
            error!("Run aborted before processing tasks: {e}");
            process::exit(1);
        }
    }
}
