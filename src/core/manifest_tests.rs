//! Manifest discovery and parsing tests

#[cfg(test)]
mod tests {
    use crate::core::manifest::{
        collect_tasks, discover_manifests, load_manifest_tasks, Manifest, MANIFEST_FILE_NAME,
    };
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    /// Lays down `<root>/<category>/downloadable_files.json` with `body`.
    fn write_manifest(root: &Path, category: &str, body: &str) {
        let dir = root.join(category);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE_NAME), body).unwrap();
    }

    #[test]
    fn discovers_manifests_recursively_with_parent_as_category() {
        let root = tempdir().unwrap();
        write_manifest(root.path(), "world-championships", "[]");
        fs::create_dir_all(root.path().join("nested/european-open")).unwrap();
        fs::write(
            root.path().join("nested/european-open").join(MANIFEST_FILE_NAME),
            "[]",
        )
        .unwrap();
        // A decoy with the wrong filename must be ignored.
        fs::write(root.path().join("world-championships/other.json"), "[]").unwrap();

        let manifests = discover_manifests(root.path());
        let categories: Vec<&str> = manifests.iter().map(|m| m.category.as_str()).collect();

        assert_eq!(manifests.len(), 2);
        assert!(categories.contains(&"world-championships"));
        assert!(categories.contains(&"european-open"));
    }

    #[test]
    fn records_without_usable_url_are_dropped_silently() {
        let root = tempdir().unwrap();
        write_manifest(
            root.path(),
            "grand-prix",
            r#"[
                {"url": "https://x.org/results/final.pdf", "text": "Final Results"},
                {"url": ""},
                {"text": "no url at all"},
                {"url": "   "},
                {"url": "https://x.org/results/draw.xlsx"}
            ]"#,
        );

        let manifests = discover_manifests(root.path());
        let tasks = load_manifest_tasks(&manifests[0]).unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].url, "https://x.org/results/final.pdf");
        assert_eq!(tasks[0].category, "grand-prix");
        assert_eq!(tasks[0].display_name.as_deref(), Some("Final Results"));
        assert_eq!(tasks[1].display_name, None);
    }

    #[test]
    fn malformed_manifest_is_a_parse_error() {
        let root = tempdir().unwrap();
        write_manifest(root.path(), "broken", "{ not json [");

        let manifests = discover_manifests(root.path());
        assert!(load_manifest_tasks(&manifests[0]).is_err());
    }

    #[test]
    fn collect_tasks_skips_malformed_manifests_and_keeps_the_rest() {
        let root = tempdir().unwrap();
        write_manifest(
            root.path(),
            "a-good",
            r#"[{"url": "https://x.org/a.pdf"}]"#,
        );
        write_manifest(root.path(), "b-broken", "not json");
        write_manifest(
            root.path(),
            "c-good",
            r#"[{"url": "https://x.org/c1.pdf"}, {"url": "https://x.org/c2.pdf"}]"#,
        );

        let tasks = collect_tasks(root.path());

        assert_eq!(tasks.len(), 3);
        assert!(tasks.iter().all(|t| t.category != "b-broken"));
    }

    #[test]
    fn unknown_record_fields_are_tolerated() {
        let manifest_dir = tempdir().unwrap();
        let path = manifest_dir.path().join(MANIFEST_FILE_NAME);
        fs::write(
            &path,
            r#"[{"url": "https://x.org/a.pdf", "added_by": "scraper", "weight": 3}]"#,
        )
        .unwrap();

        let manifest = Manifest {
            category: "extras".to_string(),
            path,
        };
        let tasks = load_manifest_tasks(&manifest).unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn missing_root_yields_no_tasks() {
        let root = tempdir().unwrap();
        let tasks = collect_tasks(&root.path().join("does-not-exist"));
        assert!(tasks.is_empty());
    }
}
