//! Destination filename derivation
//!
//! Maps a download URL (and, for crawled pages, the anchor text it was
//! found under) to the filename the document is stored as. Derivation is
//! deterministic and total so repeated runs always resolve a task to the
//! same destination path.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use crate::core::models::{DownloadTask, TaskSource};
use crate::utils::file_utils::sanitize_filename;

/// Extensions accepted as-is for manifest-driven downloads.
pub const MANIFEST_EXTENSIONS: &[&str] = &[".pdf", ".xlsx", ".xls", ".csv"];

/// Crawled result pages additionally link office documents and archives.
pub const CRAWL_EXTENSIONS: &[&str] = &[
    ".pdf", ".xlsx", ".xls", ".csv", ".doc", ".docx", ".zip",
];

/// Appended whenever a derived name carries no recognized extension.
pub const DEFAULT_EXTENSION: &str = ".pdf";

/// Resolves the destination filename for a task.
pub fn task_filename(task: &DownloadTask, source: TaskSource) -> String {
    match source {
        TaskSource::Manifest => derive_filename(&task.url, MANIFEST_EXTENSIONS),
        TaskSource::CrawledPage => filename_from_link(&task.url, task.display_name.as_deref()),
    }
}

/// Derives a filename from a URL alone: last path segment, percent-decoded,
/// spaces collapsed to underscores, default extension appended when the
/// allow-list does not recognize the one present.
pub fn derive_filename(url: &str, allowed: &[&str]) -> String {
    let segment = last_path_segment(url);
    let decoded = percent_decode_str(&segment).decode_utf8_lossy();
    let name = sanitize_filename(&decoded.replace("%20", "_").replace(' ', "_"));
    if has_allowed_extension(&name, allowed) {
        name
    } else {
        format!("{name}{DEFAULT_EXTENSION}")
    }
}

/// Crawl-variant naming: prefer the anchor's visible text, slugified, but
/// always take the extension from the URL itself.
pub fn filename_from_link(url: &str, label: Option<&str>) -> String {
    let url_name = derive_filename(url, CRAWL_EXTENSIONS);
    let slug = label.map(slugify_label).unwrap_or_default();
    if slug.is_empty() || slug == "_" {
        return url_name;
    }
    format!("{slug}{}", extension_of(&url_name))
}

/// Strips everything that is not a word character, whitespace or hyphen,
/// then collapses hyphen/space runs into a single underscore.
pub fn slugify_label(label: &str) -> String {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    static COLLAPSE: OnceLock<Regex> = OnceLock::new();
    let strip = STRIP.get_or_init(|| Regex::new(r"[^\w\s-]+").unwrap());
    let collapse = COLLAPSE.get_or_init(|| Regex::new(r"[-\s]+").unwrap());

    let stripped = strip.replace_all(label, "");
    collapse.replace_all(stripped.trim(), "_").into_owned()
}

/// True when the URL path mentions one of the allowed extensions anywhere.
/// Used as the crawl-variant anchor filter.
pub fn path_contains_allowed_extension(path: &str, allowed: &[&str]) -> bool {
    let lower = path.to_lowercase();
    allowed.iter().any(|ext| lower.contains(ext))
}

fn has_allowed_extension(name: &str, allowed: &[&str]) -> bool {
    let lower = name.to_lowercase();
    allowed.iter().any(|ext| lower.ends_with(ext))
}

fn extension_of(name: &str) -> &str {
    name.rfind('.').map(|idx| &name[idx..]).unwrap_or(DEFAULT_EXTENSION)
}

fn last_path_segment(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .unwrap_or_default()
            .to_string(),
        // Not an absolute URL; fall back to raw string splitting.
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let url = "https://x.org/docs/Final%20Results.PDF";
        assert_eq!(
            derive_filename(url, MANIFEST_EXTENSIONS),
            derive_filename(url, MANIFEST_EXTENSIONS)
        );
    }

    #[test]
    fn spaces_become_underscores_and_case_is_kept() {
        assert_eq!(
            derive_filename("https://x.org/docs/Final Results.PDF", MANIFEST_EXTENSIONS),
            "Final_Results.PDF"
        );
        assert_eq!(
            derive_filename("https://x.org/docs/Final%20Results.PDF", MANIFEST_EXTENSIONS),
            "Final_Results.PDF"
        );
    }

    #[test]
    fn missing_extension_gets_the_default() {
        assert_eq!(derive_filename("https://x.org/a/b", MANIFEST_EXTENSIONS), "b.pdf");
    }

    #[test]
    fn allowed_extensions_are_preserved() {
        assert_eq!(
            derive_filename("https://x.org/files/ranking.xlsx", MANIFEST_EXTENSIONS),
            "ranking.xlsx"
        );
        assert_eq!(
            derive_filename("https://x.org/files/archive.rar", MANIFEST_EXTENSIONS),
            "archive.rar.pdf"
        );
    }

    #[test]
    fn empty_path_yields_default_extension_only() {
        assert_eq!(derive_filename("https://x.org", MANIFEST_EXTENSIONS), ".pdf");
    }

    #[test]
    fn double_encoded_spaces_are_flattened() {
        assert_eq!(
            derive_filename("https://x.org/docs/a%2520b.pdf", MANIFEST_EXTENSIONS),
            "a_b.pdf"
        );
    }

    #[test]
    fn unparseable_input_still_produces_a_name() {
        assert_eq!(derive_filename("not a url at all", MANIFEST_EXTENSIONS), "not_a_url_at_all.pdf");
    }

    #[test]
    fn slugify_strips_punctuation_and_collapses_runs() {
        assert_eq!(slugify_label("Final Results – 2023 (v2)"), "Final_Results_2023_v2");
        assert_eq!(slugify_label("  World --- Cup  "), "World_Cup");
        assert_eq!(slugify_label("!!!"), "");
    }

    #[test]
    fn link_naming_prefers_label_but_keeps_url_extension() {
        assert_eq!(
            filename_from_link("https://x.org/files/r1.xlsx", Some("Senior Rankings 2024")),
            "Senior_Rankings_2024.xlsx"
        );
        assert_eq!(
            filename_from_link("https://x.org/files/r1.xlsx", Some("???")),
            "r1.xlsx"
        );
        assert_eq!(filename_from_link("https://x.org/files/r1.xlsx", None), "r1.xlsx");
    }

    #[test]
    fn crawl_filter_matches_anywhere_in_the_path() {
        assert!(path_contains_allowed_extension("/files/book.PDF", CRAWL_EXTENSIONS));
        assert!(path_contains_allowed_extension("/dl.php?f=result.docx", CRAWL_EXTENSIONS));
        assert!(!path_contains_allowed_extension("/pages/about.html", CRAWL_EXTENSIONS));
    }
}
