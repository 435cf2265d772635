//! Shared types used across the build and manifest modes.
//!
//! [`Entry`] is produced by [`crate::scan`] and consumed by
//! [`crate::generate`] and [`crate::reconcile`]. [`EntryManifest`] is the
//! `entries.json` document written by [`crate::manifest`] and read by the
//! client-rendered site, so its field names are part of the public format.

use serde::{Deserialize, Serialize};

/// One blog entry, built fresh from a Markdown source file on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Name of the originating file, e.g. `hello-world.md`
    pub source_filename: String,
    /// URL-safe identifier derived from the filename stem
    pub slug: String,
    /// Front-matter title, else first `# ` heading, else filename stem
    pub title: String,
    /// Front-matter tags, else the legacy `Tags:` line, else empty
    pub tags: Vec<String>,
    /// Markdown body with front-matter and the tags line removed
    pub content: String,
    /// Generated page filename, always `entry-<slug>.html`
    pub output_url: String,
}

/// Per-entry record embedded as JSON in the index page for client-side
/// search and tag filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub title: String,
    pub tags: Vec<String>,
    pub url: String,
    /// Leading slice of the raw Markdown content
    pub content: String,
}

/// The `entries.json` document for the client-rendered mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryManifest {
    /// ISO-8601 UTC timestamp of the manifest build
    pub generated_at: String,
    pub entries: Vec<ManifestEntry>,
}

/// One entry of [`EntryManifest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
    /// Path the browser fetches the raw Markdown from
    pub path: String,
}
