//! CLI output formatting for every mode.
//!
//! # Information-First Display
//!
//! Output is a content inventory: each entry leads with its positional index
//! and title, and the source file, tags or generated page follow as indented
//! context. Diagnostics (`tracing` logs) go to stderr; this inventory is the
//! only thing printed to stdout.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Entries
//! 001 Hello, World
//!     Source: hello-world.md
//!     Tags: rust, intro
//! 002 Legacy Post
//!     Source: legacy-post.md
//!     Tags: notes, archive
//!
//! Skipped
//!     empty.md: file is empty
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 Hello, World → entry-hello-world.html
//! 002 Legacy Post → entry-legacy-post.html
//!
//! Skipped
//!     empty.md: file is empty
//!
//! Removed
//!     entry-ghost.html
//!
//! Generated 2 entries, skipped 1, removed 1
//! ```
//!
//! ## Manifest
//!
//! ```text
//! 001 Hello → entries/hello.md
//!     Tags: a, b
//!
//! Wrote 1 entry to entries.json
//! ```
//!
//! # Architecture
//!
//! Each mode has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::pipeline::BuildReport;
use crate::scan::{ParseError, ScanReport};
use crate::types::EntryManifest;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn entry_header(index: usize, title: &str) -> String {
    format!("{} {}", format_index(index), title)
}

/// `Tags: a, b` context line, or nothing for an untagged entry.
fn tags_line(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        None
    } else {
        Some(format!("{}Tags: {}", indent(1), tags.join(", ")))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{count} {}", if count == 1 { one } else { many })
}

/// The `Skipped` section, empty when nothing was skipped.
fn skipped_section(errors: &[ParseError]) -> Vec<String> {
    if errors.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "Skipped".to_string()];
    for error in errors {
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            display_name(&error.file),
            error.reason
        ));
    }
    lines
}

// ============================================================================
// Check / scan output
// ============================================================================

/// Format the entries discovered by a scan.
pub fn format_scan_output(report: &ScanReport) -> Vec<String> {
    let mut lines = vec!["Entries".to_string()];

    for (i, entry) in report.entries.iter().enumerate() {
        lines.push(entry_header(i + 1, &entry.title));
        lines.push(format!("{}Source: {}", indent(1), entry.source_filename));
        lines.extend(tags_line(&entry.tags));
    }

    lines.extend(skipped_section(&report.errors));
    lines
}

pub fn print_scan_output(report: &ScanReport) {
    for line in format_scan_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the pages produced by a build, plus what was skipped and removed.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![format!("Home → {}", crate::template::INDEX_TEMPLATE)];

    for (i, entry) in report.entries.iter().enumerate() {
        lines.push(format!(
            "{} → {}",
            entry_header(i + 1, &entry.title),
            entry.output_url
        ));
    }

    lines.extend(skipped_section(&report.errors));

    if !report.reconcile.deleted.is_empty() {
        lines.push(String::new());
        lines.push("Removed".to_string());
        for path in &report.reconcile.deleted {
            lines.push(format!("{}{}", indent(1), display_name(path)));
        }
    }
    if !report.reconcile.failed.is_empty() {
        lines.push(String::new());
        lines.push("Could not remove".to_string());
        for (path, err) in &report.reconcile.failed {
            lines.push(format!("{}{}: {}", indent(1), display_name(path), err));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, skipped {}, removed {}",
        plural(report.entries.len(), "entry", "entries"),
        report.errors.len(),
        report.reconcile.deleted.len()
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Manifest output
// ============================================================================

/// Format the manifest inventory and where it was written.
pub fn format_manifest_output(
    manifest: &EntryManifest,
    errors: &[ParseError],
    out: &Path,
) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, entry) in manifest.entries.iter().enumerate() {
        lines.push(format!("{} → {}", entry_header(i + 1, &entry.title), entry.path));
        lines.extend(tags_line(&entry.tags));
    }

    lines.extend(skipped_section(errors));
    lines.push(String::new());
    lines.push(format!(
        "Wrote {} to {}",
        plural(manifest.entries.len(), "entry", "entries"),
        out.display()
    ));
    lines
}

pub fn print_manifest_output(manifest: &EntryManifest, errors: &[ParseError], out: &Path) {
    for line in format_manifest_output(manifest, errors, out) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
