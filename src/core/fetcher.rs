//! Bulk fetch engine
//!
//! Processes a batch of download tasks against a category-partitioned
//! output tree. The contract per task: a destination that already exists
//! is skipped without touching the network; anything else is fetched with
//! a streamed GET, and a write that fails part-way never leaves a partial
//! file behind. Per-task failures are recorded, not raised, so one bad
//! URL cannot abort the batch.

use futures_util::{stream, StreamExt};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::config::FetcherConfig;
use crate::core::filename::task_filename;
use crate::core::models::{AppResult, DownloadTask, Outcome, TaskSource};
use crate::core::pacer::RequestPacer;
use crate::core::summary::RunSummary;

pub struct BulkFetcher {
    client: Client,
    config: FetcherConfig,
    pacer: RequestPacer,
    source: TaskSource,
}

impl BulkFetcher {
    /// Builds the fetcher and its HTTP client. Every transport setting is
    /// explicit: timeout, redirect cap, user agent, TLS verification.
    pub fn new(config: FetcherConfig) -> AppResult<Self> {
        config.validate()?;

        if config.accept_invalid_certs {
            warn!("⚠️ TLS certificate verification is DISABLED for this run");
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.download_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let pacer = RequestPacer::new(Duration::from_millis(config.request_delay_ms));

        Ok(Self {
            client,
            config,
            pacer,
            source: TaskSource::Manifest,
        })
    }

    /// Switches to crawl-variant behaviour: the wider extension allow-list
    /// and anchor-text-preferring filenames.
    pub fn for_crawled_pages(mut self) -> Self {
        self.source = TaskSource::CrawledPage;
        self
    }

    /// Runs the whole batch and folds the outcomes into a summary.
    ///
    /// Only the inability to create the output root aborts the run; every
    /// per-task error ends up in the summary instead. Outcomes are
    /// reported in task order even when fetches overlap.
    pub async fn run(&self, output_dir: &Path, tasks: Vec<DownloadTask>) -> AppResult<RunSummary> {
        tokio::fs::create_dir_all(output_dir).await?;

        info!(
            "🚀 Processing {} task(s) (concurrency {}, delay {} ms)",
            tasks.len(),
            self.config.max_concurrent,
            self.config.request_delay_ms
        );

        let mut indexed: Vec<(usize, Outcome)> = stream::iter(tasks.into_iter().enumerate())
            .map(|(index, task)| async move { (index, self.fetch_one(output_dir, &task).await) })
            .buffer_unordered(self.config.max_concurrent)
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);

        let outcomes = indexed.into_iter().map(|(_, outcome)| outcome).collect();
        Ok(RunSummary::from_outcomes(outcomes))
    }

    /// Resolves one task to an outcome. Never fails: errors become
    /// `Outcome::Failed`.
    pub async fn fetch_one(&self, output_dir: &Path, task: &DownloadTask) -> Outcome {
        let filename = task_filename(task, self.source);
        let dest = output_dir.join(&task.category).join(&filename);

        // The idempotence rule: an existing path is proof of a prior
        // successful download. Checked before any network access.
        if dest.exists() {
            debug!("Already present, skipping: {}", dest.display());
            return Outcome::Skipped {
                url: task.url.clone(),
                path: dest,
            };
        }

        let label = task.display_name.as_deref().unwrap_or(&filename);
        info!("⬇️ {} <- {}", label, task.url);

        match self.download_to_path(&task.url, &dest).await {
            Ok(size_bytes) => {
                info!("✅ {} ({})", dest.display(), size_bytes);
                Outcome::Downloaded {
                    url: task.url.clone(),
                    path: dest,
                    size_bytes,
                    category: task.category.clone(),
                }
            }
            Err(e) => {
                warn!("❌ {}: {}", task.url, e);
                Outcome::Failed {
                    url: task.url.clone(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Fetches an HTML page for the crawl variant, with the shorter page
    /// timeout.
    pub async fn fetch_page(&self, url: &str) -> AppResult<String> {
        self.pacer.wait().await;
        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.config.page_timeout_secs))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    async fn download_to_path(&self, url: &str, dest: &Path) -> AppResult<u64> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        self.pacer.wait().await;
        let response = self.client.get(url).send().await?.error_for_status()?;

        match stream_to_file(response, dest).await {
            Ok(size) => Ok(size),
            Err(e) => {
                remove_partial(dest).await;
                Err(e)
            }
        }
    }
}

/// Streams a response body into `dest`, returning the byte count written.
async fn stream_to_file(response: reqwest::Response, dest: &Path) -> AppResult<u64> {
    let mut file = File::create(dest).await?;
    let mut body = response.bytes_stream();
    let mut total = 0u64;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        total += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(total)
}

/// Removes a half-written destination so an interrupted download can never
/// be mistaken for a completed one on the next run.
async fn remove_partial(dest: &Path) {
    if let Err(e) = tokio::fs::remove_file(dest).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove partial file {}: {}", dest.display(), e);
        }
    }
}

/// Builds one fetch destination path without touching the filesystem.
/// Exposed so callers can report where a task would land.
pub fn destination_for(output_dir: &Path, task: &DownloadTask, source: TaskSource) -> PathBuf {
    output_dir
        .join(&task.category)
        .join(task_filename(task, source))
}
