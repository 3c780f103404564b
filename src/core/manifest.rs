//! Manifest discovery and parsing
//!
//! A manifest is a JSON array of `{ "url": ..., "text": ... }` records,
//! one file per category. Manifests are discovered by walking a scan root
//! for files with the fixed manifest name; the immediate parent directory
//! of each match names the category.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use serde::{Deserialize, Serialize};

use crate::core::models::{AppError, AppResult, DownloadTask};

/// Fixed manifest filename the scan looks for.
pub const MANIFEST_FILE_NAME: &str = "downloadable_files.json";

/// One record inside a manifest file. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRecord {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub text: Option<String>,
}

/// A discovered manifest file and the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub category: String,
    pub path: PathBuf,
}

/// Recursively finds every manifest under `root`, in stable path order.
pub fn discover_manifests(root: &Path) -> Vec<Manifest> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE_NAME)
        .filter_map(|entry| {
            let category = entry
                .path()
                .parent()
                .and_then(|parent| parent.file_name())
                .and_then(|name| name.to_str())
                .map(String::from)?;
            Some(Manifest {
                category,
                path: entry.into_path(),
            })
        })
        .collect()
}

/// Parses one manifest into tasks.
///
/// Records without a usable `url` never become tasks and are not counted
/// as failures; a manifest that is not valid JSON is a parse error the
/// caller may skip.
pub fn load_manifest_tasks(manifest: &Manifest) -> AppResult<Vec<DownloadTask>> {
    let raw = fs::read_to_string(&manifest.path)?;
    let records: Vec<ManifestRecord> = serde_json::from_str(&raw)
        .map_err(|e| AppError::Parse(format!("{}: {}", manifest.path.display(), e)))?;

    let tasks = records
        .into_iter()
        .filter_map(|record| {
            if record.url.trim().is_empty() {
                debug!(
                    "Dropping manifest record without url in category {}",
                    manifest.category
                );
                return None;
            }
            let mut task = DownloadTask::new(record.url, manifest.category.clone());
            if let Some(text) = record.text {
                task = task.with_display_name(text);
            }
            Some(task)
        })
        .collect();

    Ok(tasks)
}

/// Walks `root` and collects tasks from every manifest found.
///
/// A malformed manifest only costs its own category: it is logged and
/// skipped, and the walk continues.
pub fn collect_tasks(root: &Path) -> Vec<DownloadTask> {
    let manifests = discover_manifests(root);
    info!(
        "🔍 Found {} manifest(s) under {}",
        manifests.len(),
        root.display()
    );

    let mut tasks = Vec::new();
    for manifest in manifests {
        match load_manifest_tasks(&manifest) {
            Ok(mut found) => {
                debug!("{}: {} task(s)", manifest.category, found.len());
                tasks.append(&mut found);
            }
            Err(e) => warn!("Skipping malformed manifest: {}", e),
        }
    }
    tasks
}
