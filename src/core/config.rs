//! Fetcher configuration

use serde::{Deserialize, Serialize};

use crate::core::models::{AppError, AppResult};

/// Run configuration for the bulk fetcher.
///
/// Constructed explicitly and passed in by value; there is no process-wide
/// configuration singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Concurrent fetches. 1 reproduces strictly sequential processing.
    pub max_concurrent: usize,

    /// Timeout for streamed document downloads, in seconds.
    pub download_timeout_secs: u64,

    /// Timeout for HTML page fetches in the crawl variant, in seconds.
    pub page_timeout_secs: u64,

    /// Fixed spacing between consecutive network requests, in milliseconds.
    /// 0 disables pacing (tests).
    pub request_delay_ms: u64,

    pub user_agent: String,

    /// Disables TLS certificate verification. Off by default; only ever
    /// enabled explicitly for a known-misconfigured origin, and logged
    /// loudly when active.
    pub accept_invalid_certs: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 1,

            download_timeout_secs: 60,

            page_timeout_secs: 30,

            request_delay_ms: 500,

            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),

            accept_invalid_certs: false,
        }
    }
}

impl FetcherConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.max_concurrent == 0 {
            return Err(AppError::Config(
                "max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.download_timeout_secs == 0 || self.page_timeout_secs == 0 {
            return Err(AppError::Config(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(AppError::Config("user_agent must not be empty".to_string()));
        }
        Ok(())
    }
}
