//! Core data models for the document fetcher

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a batch of tasks came from.
///
/// Controls the extension allow-list and how destination filenames are
/// derived: manifest tasks are always named from the URL, crawled-page
/// tasks prefer the anchor text they were discovered under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskSource {
    Manifest,
    CrawledPage,
}

/// One unit of download work.
///
/// Built from a manifest record (or a crawled page link) immediately before
/// dispatch; stateless and discarded after processing. The destination
/// filename is always derived, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: String,

    /// Logical grouping; maps to a destination subfolder.
    pub category: String,

    /// Optional human label, used for logging and crawl-variant naming.
    pub display_name: Option<String>,
}

impl DownloadTask {
    pub fn new(url: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            category: category.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// Result of attempting one task.
///
/// Failures are values, never propagated errors: one task failing must not
/// abort its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Downloaded {
        url: String,
        path: PathBuf,
        size_bytes: u64,
        category: String,
    },

    /// Target already existed on disk; no network access was made.
    Skipped { url: String, path: PathBuf },

    Failed { url: String, error: String },
}

impl Outcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Downloaded { url, .. } | Self::Skipped { url, .. } | Self::Failed { url, .. } => {
                url
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
