//! Document Fetcher Pro - Core Library
//!
//! Batch fetcher for manifest-driven document archives: discovers download
//! manifests (or extracts links from crawled pages), materializes files
//! under a category-partitioned output tree, and records a per-run summary
//! of everything downloaded, skipped and failed.

pub mod core;
pub mod utils;

// Re-export commonly used types
pub use self::core::{
    config::FetcherConfig,
    fetcher::BulkFetcher,
    manifest::{collect_tasks, MANIFEST_FILE_NAME},
    models::{AppError, AppResult, DownloadTask, Outcome, TaskSource},
    summary::RunSummary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging for the binaries with a sensible default filter.
pub fn init() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "document_fetcher_pro=info");
    }

    utils::logging::init_tracing();

    tracing::debug!("📚 {} v{} initialized", NAME, VERSION);
}
