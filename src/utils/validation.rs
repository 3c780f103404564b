//! URL and input validation utilities

use anyhow::{anyhow, Result};
use url::Url;

/// Validate a URL string and hand back the parsed form.
pub fn validate_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| anyhow!("Invalid URL format: {}", e))
}

/// Check that a URL is something the fetcher can actually pull.
pub fn is_fetchable_url(url: &str) -> bool {
    if let Ok(parsed) = Url::parse(url) {
        let scheme = parsed.scheme();
        scheme == "http" || scheme == "https"
    } else {
        false
    }
}
