//! Download-link extraction from crawled HTML pages
//!
//! The alternate task source for origins that publish result books as
//! plain anchor lists instead of manifests. Anchors are filtered by the
//! crawl extension allow-list, resolved against the page base URL and
//! de-duplicated, yielding the same task shape the fetch engine consumes.

use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use crate::core::filename::{path_contains_allowed_extension, CRAWL_EXTENSIONS};
use crate::core::models::DownloadTask;

/// Extracts de-duplicated download tasks from the anchors of `html`.
///
/// Hrefs that do not resolve against `base_url`, or whose path mentions no
/// allow-listed extension, are ignored. The first anchor for a resolved
/// URL wins; later duplicates contribute nothing.
pub fn extract_tasks(html: &str, base_url: &Url, category: &str) -> Vec<DownloadTask> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").unwrap();

    let mut seen: HashSet<String> = HashSet::new();
    let mut tasks = Vec::new();

    for element in document.select(&anchors) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base_url.join(href) else {
            debug!("Ignoring unresolvable href {:?}", href);
            continue;
        };
        if !path_contains_allowed_extension(resolved.path(), CRAWL_EXTENSIONS) {
            continue;
        }

        let resolved = resolved.to_string();
        if !seen.insert(resolved.clone()) {
            continue;
        }

        let label = element.text().collect::<String>();
        let label = label.trim();

        let mut task = DownloadTask::new(resolved, category);
        if !label.is_empty() {
            task = task.with_display_name(label);
        }
        tasks.push(task);
    }

    tasks
}
