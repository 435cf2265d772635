//! Build orchestration.
//!
//! Runs the build stages in order and stops at the first fatal condition:
//!
//! ```text
//! 1. entries dir exists        ScanError::MissingDirectory
//! 2. templates dir exists      BuildError::MissingTemplates
//! 3. config.json loads         ConfigError
//! 4. templates load            TemplateError
//! 5. scan entries              per-file errors collected, not fatal
//! 6. at least one entry        BuildError::NoEntries
//! 7. write pages               GenerateError
//! 8. remove orphaned pages     failures collected, not fatal
//! ```
//!
//! Nothing is written before step 7, so a run that fails early leaves the
//! previous output untouched.

use crate::config::{self, ConfigError};
use crate::generate::{GenerateError, PageRenderer};
use crate::reconcile::{self, ReconcileReport};
use crate::scan::{self, ParseError, ScanError, ScanReport};
use crate::template::{TemplateError, Templates};
use crate::types::Entry;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_ENTRIES_DIR: &str = "entries";
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
pub const DEFAULT_OUTPUT_DIR: &str = "_site";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Templates directory not found: {}", .0.display())]
    MissingTemplates(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("No entries could be parsed from {}", .0.display())]
    NoEntries(PathBuf),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Where a build reads from and writes to.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPaths {
    pub entries_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config_path: PathBuf,
}

impl BuildPaths {
    /// The default layout rooted at `root`.
    pub fn under(root: &Path) -> Self {
        Self {
            entries_dir: root.join(DEFAULT_ENTRIES_DIR),
            templates_dir: root.join(DEFAULT_TEMPLATES_DIR),
            output_dir: root.join(DEFAULT_OUTPUT_DIR),
            config_path: root.join(DEFAULT_CONFIG_FILE),
        }
    }
}

impl Default for BuildPaths {
    fn default() -> Self {
        Self::under(Path::new(""))
    }
}

#[derive(Debug)]
pub struct BuildReport {
    /// Entries that were rendered, in filename order
    pub entries: Vec<Entry>,
    /// Source files that were skipped
    pub errors: Vec<ParseError>,
    /// Pages written, index first
    pub written: Vec<PathBuf>,
    pub reconcile: ReconcileReport,
}

/// Run a full build.
pub fn build(paths: &BuildPaths) -> Result<BuildReport, BuildError> {
    let (renderer, report) = prepare(paths)?;

    info!("Generating pages into {}", paths.output_dir.display());
    let written = renderer.write_site(&report.entries, &paths.output_dir)?;

    let reconcile = reconcile::reconcile(&paths.output_dir, &report.entries);
    if !reconcile.deleted.is_empty() {
        info!("Removed {} orphaned page(s)", reconcile.deleted.len());
    }

    Ok(BuildReport {
        entries: report.entries,
        errors: report.errors,
        written,
        reconcile,
    })
}

/// Validate inputs and render every page in memory without writing.
pub fn check(paths: &BuildPaths) -> Result<ScanReport, BuildError> {
    let (renderer, report) = prepare(paths)?;
    renderer.render_index(&report.entries)?;
    for entry in &report.entries {
        renderer.render_entry(entry);
    }
    Ok(report)
}

fn prepare(paths: &BuildPaths) -> Result<(PageRenderer, ScanReport), BuildError> {
    if !paths.entries_dir.is_dir() {
        return Err(ScanError::MissingDirectory(paths.entries_dir.clone()).into());
    }
    if !paths.templates_dir.is_dir() {
        return Err(BuildError::MissingTemplates(paths.templates_dir.clone()));
    }

    let config = config::load_config(&paths.config_path)?;
    let templates = Templates::load(&paths.templates_dir)?;

    info!("Scanning {}", paths.entries_dir.display());
    let report = scan::scan(&paths.entries_dir)?;
    if report.entries.is_empty() {
        return Err(BuildError::NoEntries(paths.entries_dir.clone()));
    }
    info!(
        entries = report.entries.len(),
        skipped = report.errors.len(),
        "Scan complete"
    );

    Ok((PageRenderer::new(templates, config), report))
}
