//! Slug and output filename derivation.
//!
//! Every entry is identified by a slug derived from its source filename stem,
//! and every generated entry page is named after that slug:
//!
//! - `Hello World.md` → slug `hello-world` → `entry-hello-world.html`
//! - `2024_Recap.md` → slug `2024_recap` → `entry-2024_recap.html`
//! - `C++ Tips!.md` → slug `c-tips` → `entry-c-tips.html`
//!
//! The reconcile stage relies on [`output_url`] being a pure function of the
//! slug and on [`is_entry_page`] matching exactly the names [`output_url`]
//! produces.

const ENTRY_PAGE_PREFIX: &str = "entry-";
const ENTRY_PAGE_SUFFIX: &str = ".html";

/// Derive a URL-safe slug from a filename stem.
///
/// Lower-cases the input, maps each run of whitespace to a single `-`, and
/// drops every character outside `[a-z0-9-_]`. The result may be empty (e.g.
/// for a stem made only of non-Latin characters); callers decide what to do.
pub fn slugify(stem: &str) -> String {
    let mut slug = String::with_capacity(stem.len());
    let mut in_whitespace = false;
    for c in stem.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' {
            slug.push(c);
        }
    }
    slug
}

/// Output filename for an entry page: `entry-<slug>.html`.
pub fn output_url(slug: &str) -> String {
    format!("{ENTRY_PAGE_PREFIX}{slug}{ENTRY_PAGE_SUFFIX}")
}

/// Whether `filename` looks like a generated entry page (`entry-*.html`).
pub fn is_entry_page(filename: &str) -> bool {
    filename.len() >= ENTRY_PAGE_PREFIX.len() + ENTRY_PAGE_SUFFIX.len()
        && filename.starts_with(ENTRY_PAGE_PREFIX)
        && filename.ends_with(ENTRY_PAGE_SUFFIX)
}
