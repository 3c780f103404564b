//! `docfetch` - manifest-driven batch fetch run
//!
//! Walks an input tree for download manifests, fetches every referenced
//! document into a category-partitioned output tree, prints the run report
//! and persists the summary JSON. A run that merely contains failed tasks
//! still exits 0; only failing to start is an error exit.

use std::env;
use std::path::PathBuf;
use std::process;

use document_fetcher_pro::core::config::FetcherConfig;
use document_fetcher_pro::core::fetcher::BulkFetcher;
use document_fetcher_pro::core::manifest;
use document_fetcher_pro::utils::file_utils::ensure_dir_exists;
use tracing::{error, info};

const DEFAULT_INPUT: &str = "data_all_categories";
const DEFAULT_OUTPUT: &str = "downloaded_pdfs";

struct CliArgs {
    input: PathBuf,
    output: PathBuf,
    concurrency: usize,
    delay_ms: u64,
    insecure: bool,
    help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        let defaults = FetcherConfig::default();
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            concurrency: defaults.max_concurrent,
            delay_ms: defaults.request_delay_ms,
            insecure: false,
            help: false,
        }
    }
}

fn print_usage() {
    eprintln!("Usage: docfetch [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -i, --input <dir>      Manifest scan root (default: {DEFAULT_INPUT})");
    eprintln!("  -o, --output <dir>     Download destination root (default: {DEFAULT_OUTPUT})");
    eprintln!("      --concurrency <n>  Concurrent fetches (default: 1)");
    eprintln!("      --delay-ms <n>     Spacing between requests in ms (default: 500)");
    eprintln!("      --insecure         Disable TLS certificate verification");
    eprintln!("  -h, --help             Show this help");
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-i" | "--input" => parsed.input = PathBuf::from(next_value(&mut args, &arg)?),
            "-o" | "--output" => parsed.output = PathBuf::from(next_value(&mut args, &arg)?),
            "--concurrency" => {
                parsed.concurrency = next_value(&mut args, &arg)?
                    .parse()
                    .map_err(|_| format!("{arg} expects a positive integer"))?;
            }
            "--delay-ms" => {
                parsed.delay_ms = next_value(&mut args, &arg)?
                    .parse()
                    .map_err(|_| format!("{arg} expects an integer"))?;
            }
            "--insecure" => parsed.insecure = true,
            "-h" | "--help" => parsed.help = true,
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    Ok(parsed)
}

fn next_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} expects a value"))
}

#[tokio::main]
async fn main() {
    document_fetcher_pro::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            process::exit(2);
        }
    };

    if args.help {
        print_usage();
        return;
    }

    if let Err(e) = ensure_dir_exists(&args.output) {
        error!("Cannot prepare output directory: {e}");
        process::exit(1);
    }

    let config = FetcherConfig {
        max_concurrent: args.concurrency,
        request_delay_ms: args.delay_ms,
        accept_invalid_certs: args.insecure,
        ..FetcherConfig::default()
    };

    let fetcher = match BulkFetcher::new(config) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Cannot start: {e}");
            process::exit(1);
        }
    };

    let tasks = manifest::collect_tasks(&args.input);
    if tasks.is_empty() {
        info!("No download tasks found under {}", args.input.display());
    }

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
