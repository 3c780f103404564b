//! Run summary aggregation, reporting and persistence
//!
//! Outcomes are folded into a `RunSummary` value owned by the caller; the
//! summary is printed as a category-grouped report and persisted as a
//! timestamped JSON document so repeated runs never overwrite each other.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::{AppResult, Outcome};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadedFile {
    pub url: String,
    pub file: String,
    pub size: u64,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub url: String,
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFetch {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub total_downloaded: usize,
    pub total_skipped: usize,
    pub total_failed: usize,
}

/// Aggregate result of one fetch run. Written once, never appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub timestamp: DateTime<Local>,
    pub downloaded: Vec<DownloadedFile>,
    pub skipped: Vec<SkippedFile>,
    pub failed: Vec<FailedFetch>,
    pub stats: RunStats,
}

impl RunSummary {
    /// Folds per-task outcomes, in processing order, into the summary.
    pub fn from_outcomes(outcomes: Vec<Outcome>) -> Self {
        let mut downloaded = Vec::new();
        let mut skipped = Vec::new();
        let mut failed = Vec::new();

        for outcome in outcomes {
            match outcome {
                Outcome::Downloaded {
                    url,
                    path,
                    size_bytes,
                    category,
                } => downloaded.push(DownloadedFile {
                    url,
                    file: path.display().to_string(),
                    size: size_bytes,
                    category,
                }),
                Outcome::Skipped { url, path } => skipped.push(SkippedFile {
                    url,
                    file: path.display().to_string(),
                }),
                Outcome::Failed { url, error } => failed.push(FailedFetch { url, error }),
            }
        }

        let stats = RunStats {
            total_downloaded: downloaded.len(),
            total_skipped: skipped.len(),
            total_failed: failed.len(),
        };

        Self {
            timestamp: Local::now(),
            downloaded,
            skipped,
            failed,
            stats,
        }
    }

    /// Number of tasks this run resolved, whatever the outcome.
    pub fn total_tasks(&self) -> usize {
        self.stats.total_downloaded + self.stats.total_skipped + self.stats.total_failed
    }

    pub fn total_bytes(&self) -> u64 {
        self.downloaded.iter().map(|entry| entry.size).sum()
    }

    /// Writes the summary JSON into `output_dir` under a timestamped name
    /// and returns the path written.
    pub fn persist(&self, output_dir: &Path) -> AppResult<PathBuf> {
        let filename = format!(
            "download_summary_{}.json",
            self.timestamp.format("%Y%m%d_%H%M%S")
        );
        let path = output_dir.join(filename);
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| crate::core::models::AppError::Parse(e.to_string()))?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Prints the human-readable end-of-run report. Every failure is
    /// listed; nothing is hidden behind counts.
    pub fn print_report(&self) {
        println!();
        println!("================ Download run report ================");
        println!("Finished: {}", self.timestamp.format("%Y-%m-%d %H:%M:%S"));

        if !self.downloaded.is_empty() {
            println!("\nDownloaded by category:");
            let mut per_category: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
            for entry in &self.downloaded {
                let slot = per_category.entry(entry.category.as_str()).or_default();
                slot.0 += 1;
                slot.1 += entry.size;
            }
            for (category, (count, bytes)) in per_category {
                println!("  {:30} {:4} file(s)  {}", category, count, format_size(bytes));
            }
        }

        println!(
            "\nDownloaded: {} ({})",
            self.stats.total_downloaded,
            format_size(self.total_bytes())
        );
        println!("Skipped (already present): {}", self.stats.total_skipped);
        println!("Failed: {}", self.stats.total_failed);

        for failure in &self.failed {
            println!("  ✗ {}: {}", failure.url, failure.error);
        }

        println!("=====================================================");
    }
}

fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let bytes = bytes as f64;
    if bytes >= GB {
        format!("{:.2} GB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{} B", bytes as u64)
    }
}
