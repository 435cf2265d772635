//! Removal of stale entry pages.
//!
//! Final stage of the build. After a successful write, the output directory
//! must hold exactly one `entry-*.html` page per current entry. Pages left over
//! from deleted or renamed sources are removed here. Nothing else in the
//! output directory is touched: `index.html`, stylesheets, images and any
//! other file the author keeps there survive.
//!
//! A deletion that fails is logged and reported but never fails the build;
//! the next run will try again.

use crate::naming;
use crate::types::Entry;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Orphaned pages removed, sorted by path
    pub deleted: Vec<PathBuf>,
    /// Orphaned pages that could not be removed
    pub failed: Vec<(PathBuf, io::Error)>,
}

/// Delete every `entry-*.html` in `output_dir` that is not the page of one of
/// `entries`. A missing or unreadable output directory yields an empty report.
pub fn reconcile(output_dir: &Path, entries: &[Entry]) -> ReconcileReport {
    reconcile_with(output_dir, entries, |path| fs::remove_file(path))
}

fn reconcile_with(
    output_dir: &Path,
    entries: &[Entry],
    mut remove: impl FnMut(&Path) -> io::Result<()>,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();
    if !output_dir.is_dir() {
        return report;
    }

    let mut orphans = orphaned_pages(output_dir, entries);
    orphans.sort();

    for path in orphans {
        match remove(&path) {
            Ok(()) => {
                info!("Deleted orphaned entry: {}", path.display());
                report.deleted.push(path);
            }
            Err(err) => {
                warn!("Failed to delete {}: {}", path.display(), err);
                report.failed.push((path, err));
            }
        }
    }

    report
}

/// Stale pages in `output_dir`. Listing errors are logged and skipped.
fn orphaned_pages(output_dir: &Path, entries: &[Entry]) -> Vec<PathBuf> {
    let read_dir = match fs::read_dir(output_dir) {
        Ok(read_dir) => read_dir,
        Err(err) => {
            warn!("Cannot list {}: {}", output_dir.display(), err);
            return Vec::new();
        }
    };

    let expected: HashSet<&str> = entries.iter().map(|e| e.output_url.as_str()).collect();
    let mut orphans = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(dir_entry) => dir_entry,
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {}", output_dir.display(), err);
                continue;
            }
        };
        match dir_entry.file_type() {
            Ok(file_type) if file_type.is_file() => {}
            Ok(_) => continue,
            Err(err) => {
                warn!("Skipping {}: {}", dir_entry.path().display(), err);
                continue;
            }
        }
        let file_name = dir_entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if naming::is_entry_page(name) && !expected.contains(name) {
            orphans.push(dir_entry.path());
        }
    }
    orphans
}
