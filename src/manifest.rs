//! `entries.json` generation for the client-rendered site.
//!
//! In this mode no HTML is generated: the browser fetches `entries.json`,
//! lists the entries, and fetches each raw Markdown file on demand. The
//! builder only needs enough metadata for the listing:
//!
//! ```json
//! {
//!   "generatedAt": "2024-05-01T12:00:00.000Z",
//!   "entries": [
//!     {
//!       "slug": "hello-world",
//!       "title": "Hello World",
//!       "tags": ["rust", "intro"],
//!       "path": "entries/hello-world.md"
//!     }
//!   ]
//! }
//! ```
//!
//! Only the in-body conventions are read here (a `# ` title line and a
//! `Tags:` line anywhere in the body). A leading front-matter block is
//! skipped but not interpreted.

use crate::frontmatter;
use crate::naming;
use crate::scan::{self, EntryError, ParseError, ScanError};
use crate::types::{EntryManifest, ManifestEntry};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build the manifest for every Markdown file in `dir`.
///
/// Files that cannot be read or that produce an empty or already-claimed slug
/// are skipped and returned alongside the manifest.
pub fn build_manifest(
    dir: &Path,
    path_prefix: &str,
    generated_at: DateTime<Utc>,
) -> Result<(EntryManifest, Vec<ParseError>), ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::MissingDirectory(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    let mut errors = Vec::new();
    let mut claimed: HashMap<String, String> = HashMap::new();

    for path in scan::markdown_files(dir)? {
        let filename = scan::file_name(&path);
        let result = fs::read_to_string(&path)
            .map_err(EntryError::from)
            .and_then(|text| manifest_entry(&filename, &text, path_prefix));

        let result = result.and_then(|entry| match claimed.get(&entry.slug) {
            Some(existing) => Err(EntryError::DuplicateSlug {
                slug: entry.slug.clone(),
                existing: existing.clone(),
            }),
            None => {
                claimed.insert(entry.slug.clone(), filename.clone());
                Ok(entry)
            }
        });

        match result {
            Ok(entry) => entries.push(entry),
            Err(reason) => {
                warn!("Skipping {}: {}", path.display(), reason);
                errors.push(ParseError { file: path, reason });
            }
        }
    }

    let manifest = EntryManifest {
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        entries,
    };
    Ok((manifest, errors))
}

/// Metadata for one file, read with the in-body conventions only.
///
/// A file with no usable heading is titled after its stem.
pub fn manifest_entry(
    filename: &str,
    text: &str,
    path_prefix: &str,
) -> Result<ManifestEntry, EntryError> {
    let stem = scan::file_stem(filename);
    let slug = naming::slugify(&stem);
    if slug.is_empty() {
        return Err(EntryError::EmptySlug);
    }

    let (_, body) = frontmatter::split_front_matter(text);
    let lines: Vec<&str> = body.lines().collect();
    let title = scan::find_title_line(&lines)
        .map(|i| scan::heading_text(lines[i]).to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or(stem);
    let tags = lines
        .iter()
        .find(|line| scan::is_tags_line(line))
        .map(|line| scan::parse_tags_line(line))
        .unwrap_or_default();

    Ok(ManifestEntry {
        slug,
        title,
        tags,
        path: join_prefix(path_prefix, filename),
    })
}

/// Write `manifest` as 2-space indented JSON, creating parent directories.
pub fn write_manifest(path: &Path, manifest: &EntryManifest) -> Result<(), ManifestError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(path, json)?;
    info!(
        entries = manifest.entries.len(),
        "Generated {}",
        path.display()
    );
    Ok(())
}

fn join_prefix(prefix: &str, filename: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        filename.to_string()
    } else {
        format!("{prefix}/{filename}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn reads_title_and_tags_from_body() {
        let entry = manifest_entry("hello.md", "# Hello\nTags: a, b\n\nBody", "entries").unwrap();
        assert_eq!(
            entry,
            ManifestEntry {
                slug: "hello".into(),
                title: "Hello".into(),
                tags: vec!["a".into(), "b".into()],
                path: "entries/hello.md".into(),
            }
        );
    }

    #[test]
    fn tags_line_may_appear_anywhere() {
        let text = "# T\n\nSome prose first.\n\ntags: late\n";
        let entry = manifest_entry("t.md", text, "entries").unwrap();
        assert_eq!(entry.tags, vec!["late"]);
    }

    #[test]
    fn first_tags_line_wins() {
        let entry = manifest_entry("t.md", "Tags: one\nTags: two\n", "e").unwrap();
        assert_eq!(entry.tags, vec!["one"]);
    }

    #[test]
    fn title_falls_back_to_stem() {
        let entry = manifest_entry("Road Trip.md", "no heading", "entries").unwrap();
        assert_eq!(entry.title, "Road Trip");
        assert_eq!(entry.slug, "road-trip");
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn front_matter_is_not_interpreted() {
        let text = "---\ntitle: FM\ntags: [x]\n---\n# Body Title\n";
        let entry = manifest_entry("fm.md", text, "entries").unwrap();
        assert_eq!(entry.title, "Body Title");
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn empty_slug_is_an_error() {
        let result = manifest_entry("???.md", "# T", "entries");
        assert!(matches!(result, Err(EntryError::EmptySlug)));
    }

    #[test]
    fn path_prefix_is_joined_once() {
        assert_eq!(join_prefix("entries/", "a.md"), "entries/a.md");
        assert_eq!(join_prefix("posts", "a.md"), "posts/a.md");
        assert_eq!(join_prefix("", "a.md"), "a.md");
    }

    #[test]
    fn build_manifest_over_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.md"), "# Bee\nTags: insects").unwrap();
        fs::write(tmp.path().join("a.md"), "# Ay").unwrap();
        fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let (manifest, errors) = build_manifest(tmp.path(), "entries", fixed_time()).unwrap();

        assert!(errors.is_empty());
        assert_eq!(manifest.generated_at, "2024-05-01T12:00:00.000Z");
        let slugs: Vec<_> = manifest.entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b"]);
        assert_eq!(manifest.entries[1].tags, vec!["insects"]);
    }

    #[test]
    fn slug_collision_is_reported() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("My Post.md"), "# One").unwrap();
        fs::write(tmp.path().join("my  post.md"), "# Two").unwrap();

        let (manifest, errors) = build_manifest(tmp.path(), "entries", fixed_time()).unwrap();

        assert_eq!(manifest.entries.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].reason,
            EntryError::DuplicateSlug { ref slug, .. } if slug == "my-post"
        ));
    }

    #[test]
    fn missing_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let result = build_manifest(&tmp.path().join("nope"), "entries", fixed_time());
        assert!(matches!(result, Err(ScanError::MissingDirectory(_))));
    }

    #[test]
    fn write_manifest_uses_camel_case_and_indent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out").join("entries.json");
        let manifest = EntryManifest {
            generated_at: "2024-05-01T12:00:00.000Z".into(),
            entries: vec![ManifestEntry {
                slug: "a".into(),
                title: "A".into(),
                tags: vec![],
                path: "entries/a.md".into(),
            }],
        };

        write_manifest(&path, &manifest).unwrap();

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.starts_with("{\n  \"generatedAt\": \"2024-05-01T12:00:00.000Z\","));
        assert!(json.contains("\n  \"entries\": [\n    {\n      \"slug\": \"a\","));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["entries"][0]["path"], "entries/a.md");
    }
}
