//! Entry discovery and parsing.
//!
//! Stage 1 of the build. Reads every Markdown file directly inside the
//! entries directory and turns each one into an [`Entry`].
//!
//! ## Source Format
//!
//! ```text
//! entries/
//! ├── hello-world.md       # front-matter title/tags
//! ├── legacy-post.md       # `# Title` + `Tags: a, b` lines
//! └── Plain Notes.md       # no metadata: title falls back to "Plain Notes"
//! ```
//!
//! Metadata resolution (first available wins):
//!
//! | Field | 1st | 2nd | 3rd |
//! |-------|-----|-----|-----|
//! | title | front-matter `title` | first `# ` line | filename stem |
//! | tags  | front-matter `tags`  | `Tags:` line    | empty |
//!
//! The `Tags:` line only counts when it directly follows the title line or
//! sits among the leading lines of the body (before any real content).
//!
//! ## Failure Model
//!
//! A missing entries directory is fatal ([`ScanError`]). Anything wrong with a
//! single file is not: the file is skipped, logged, and reported as a
//! [`ParseError`] in [`ScanReport::errors`], and the scan moves on.

use crate::frontmatter::{self, FrontMatter};
use crate::naming;
use crate::types::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Entries directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory listing error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Why a single source file was rejected.
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("unreadable file: {0}")]
    Read(#[from] std::io::Error),
    #[error("file is empty")]
    EmptyFile,
    #[error("no content left after removing metadata")]
    NoContent,
    #[error("filename does not produce a usable slug")]
    EmptySlug,
    #[error("slug '{slug}' is already used by {existing}")]
    DuplicateSlug { slug: String, existing: String },
}

/// A per-file failure, scoped to the file it happened in.
#[derive(Error, Debug)]
#[error("{}: {reason}", .file.display())]
pub struct ParseError {
    pub file: PathBuf,
    #[source]
    pub reason: EntryError,
}

/// Result of scanning the entries directory.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Parsed entries, in filename order
    pub entries: Vec<Entry>,
    /// Files that were skipped, in filename order
    pub errors: Vec<ParseError>,
}

pub fn scan(dir: &Path) -> Result<ScanReport, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::MissingDirectory(dir.to_path_buf()));
    }

    let mut report = ScanReport::default();
    let mut claimed: HashMap<String, String> = HashMap::new();

    for path in markdown_files(dir)? {
        let filename = file_name(&path);
        let parsed = fs::read_to_string(&path)
            .map_err(EntryError::from)
            .and_then(|text| parse_entry(&filename, &text))
            .and_then(|entry| claim_slug(&mut claimed, entry));

        match parsed {
            Ok(entry) => {
                tracing::debug!(file = %filename, slug = %entry.slug, "parsed entry");
                report.entries.push(entry);
            }
            Err(reason) => {
                tracing::warn!("Skipping {}: {}", path.display(), reason);
                report.errors.push(ParseError { file: path, reason });
            }
        }
    }

    Ok(report)
}

/// Parse one Markdown source into an [`Entry`].
///
/// `filename` is the source file name including extension; its stem feeds the
/// slug and the title fallback.
pub fn parse_entry(filename: &str, text: &str) -> Result<Entry, EntryError> {
    if text.trim().is_empty() {
        return Err(EntryError::EmptyFile);
    }

    let stem = file_stem(filename);
    let slug = naming::slugify(&stem);
    if slug.is_empty() {
        return Err(EntryError::EmptySlug);
    }

    let (front_matter, body) = frontmatter::split_front_matter(text);
    let lines: Vec<&str> = body.lines().collect();
    let title_line = find_title_line(&lines);
    let tags_line = find_tags_line(&lines, title_line);

    let title = front_matter
        .as_ref()
        .and_then(FrontMatter::title)
        .or_else(|| title_line.map(|i| heading_text(lines[i]).to_string()))
        .unwrap_or_else(|| stem.clone());

    let tags = match front_matter.as_ref().and_then(FrontMatter::tags) {
        Some(tags) => tags,
        None => tags_line.map(|i| parse_tags_line(lines[i])).unwrap_or_default(),
    };

    let content = lines
        .iter()
        .enumerate()
        .filter(|&(i, _)| Some(i) != tags_line)
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n");
    let content = content.trim_matches('\n');
    if content.trim().is_empty() {
        return Err(EntryError::NoContent);
    }

    Ok(Entry {
        source_filename: filename.to_string(),
        output_url: naming::output_url(&slug),
        slug,
        title,
        tags,
        content: content.to_string(),
    })
}

fn claim_slug(claimed: &mut HashMap<String, String>, entry: Entry) -> Result<Entry, EntryError> {
    if let Some(existing) = claimed.get(&entry.slug) {
        return Err(EntryError::DuplicateSlug {
            slug: entry.slug,
            existing: existing.clone(),
        });
    }
    claimed.insert(entry.slug.clone(), entry.source_filename.clone());
    Ok(entry)
}

/// Markdown files directly inside `dir`, sorted by filename.
pub(crate) fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    for item in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let item = item?;
        if item.file_type().is_file() && is_markdown(item.path()) {
            files.push(item.into_path());
        }
    }
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub(crate) fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

// ============================================================================
// Legacy in-body heuristics (shared with the manifest builder)
// ============================================================================

/// Index of the first `# ` heading line outside fenced code blocks.
pub(crate) fn find_title_line(lines: &[&str]) -> Option<usize> {
    let mut in_fence = false;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence && trimmed.starts_with("# ") {
            return Some(i);
        }
    }
    None
}

/// Index of the `Tags:` line, if it directly follows the title line or
/// appears before the first content line.
fn find_tags_line(lines: &[&str], title_line: Option<usize>) -> Option<usize> {
    if let Some(title) = title_line
        && lines.get(title + 1).is_some_and(|line| is_tags_line(line))
    {
        return Some(title + 1);
    }

    for (i, line) in lines.iter().enumerate() {
        if is_tags_line(line) {
            return Some(i);
        }
        if line.trim().is_empty() || Some(i) == title_line {
            continue;
        }
        break;
    }
    None
}

pub(crate) fn is_tags_line(line: &str) -> bool {
    line.trim()
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("tags:"))
}

pub(crate) fn parse_tags_line(line: &str) -> Vec<String> {
    frontmatter::split_list(&line.trim()[5..])
}

pub(crate) fn heading_text(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed.strip_prefix("# ").unwrap_or(trimmed).trim()
}
