//! Shared test utilities for the quillpress test suite.
//!
//! Provides fixture setup and lookup helpers that work with scan-phase data
//! (`ScanReport`, `Entry`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let report = scan(&tmp.path().join("entries")).unwrap();
//!
//! let entry = find_entry(&report, "hello-world");
//! assert_eq!(entry.title, "Hello, World");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::pipeline::BuildPaths;
use crate::scan::ScanReport;
use crate::types::Entry;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// The copy holds `config.json`, `entries/` and `templates/`; tests can
/// mutate it freely.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Build paths for a site laid out under `root` with the default names.
pub fn site_paths(root: &Path) -> BuildPaths {
    BuildPaths::under(root)
}

/// Read a generated file from the output directory. Panics if missing.
pub fn read_output(paths: &BuildPaths, name: &str) -> String {
    let path = paths.output_dir.join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("could not read {}: {e}", path.display()))
}

/// Names of the files in the output directory, sorted.
pub fn output_files(paths: &BuildPaths) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(&paths.output_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =========================================================================
// Scan lookups
// =========================================================================

/// Find an entry by slug. Panics if not found.
pub fn find_entry<'a>(report: &'a ScanReport, slug: &str) -> &'a Entry {
    report
        .entries
        .iter()
        .find(|e| e.slug == slug)
        .unwrap_or_else(|| {
            let slugs = entry_slugs(report);
            panic!("entry '{slug}' not found. Available: {slugs:?}")
        })
}

/// All entry slugs in scan order.
pub fn entry_slugs(report: &ScanReport) -> Vec<&str> {
    report.entries.iter().map(|e| e.slug.as_str()).collect()
}
