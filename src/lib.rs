//! # Quillpress
//!
//! A minimal static blog generator. A directory of Markdown files becomes a
//! directory of HTML pages: one index with client-side search and tag
//! filtering, and one page per entry.
//!
//! # Architecture: Build Pipeline
//!
//! ```text
//! 1. Scan       entries/*.md         →  Vec<Entry>        (parse, never abort on one bad file)
//! 2. Generate   entries + templates  →  _site/*.html      (fill placeholders, render Markdown)
//! 3. Reconcile  _site/               →  _site/            (remove pages of deleted entries)
//! ```
//!
//! Every run rebuilds everything from the sources. There is no cache and no
//! incremental mode: output is a pure function of the entries directory, the
//! templates and `config.json`, so rebuilding unchanged sources rewrites
//! byte-identical pages and deletes nothing.
//!
//! A second mode skips HTML generation entirely and writes `entries.json` for
//! a site that renders Markdown in the browser (see [`manifest`]).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: reads Markdown files and resolves title, tags and content |
//! | [`generate`] | Stage 2: fills the index and entry templates and writes the pages |
//! | [`reconcile`] | Stage 3: deletes `entry-*.html` pages with no source |
//! | [`pipeline`] | Runs the stages in order and decides what is fatal |
//! | [`manifest`] | `entries.json` for the client-rendered mode |
//! | [`config`] | `config.json` loading and validation, both deployment shapes |
//! | [`frontmatter`] | `---` delimited `key: value` block parser |
//! | [`markdown`] | Markdown to HTML with GFM extensions, autolinks and heading anchors |
//! | [`template`] | Placeholder substitution with explicit text/markup slots |
//! | [`naming`] | Slug and output filename derivation |
//! | [`types`] | Shared data model (`Entry`, `IndexSummary`, `EntryManifest`) |
//! | [`output`] | CLI inventory formatting |
//!
//! # Design Decisions
//!
//! ## Templates Are Author Files
//!
//! Unlike the entry-tag and tag-filter fragments, which are generated with
//! [Maud](https://maud.lambda.xyz/), the page shells are plain HTML files in
//! `templates/`. Authors restyle the blog without recompiling. The cost is
//! that substitution is textual, so every value is marked as either text
//! (escaped) or markup (verbatim) when it is bound; see [`template::Slots`].
//!
//! ## One Bad File Never Stops a Build
//!
//! An empty, unreadable or colliding entry is skipped with a warning and
//! listed in the CLI output. Only conditions that make the whole site wrong
//! are fatal: a missing entries or templates directory, missing config, or
//! zero usable entries.
//!
//! ## Metadata Without YAML
//!
//! Front-matter is a tiny `key: value` format, not YAML. Older entries that
//! predate front-matter still work: a `# Title` line and a `Tags: a, b` line
//! supply the same metadata.

pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod manifest;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod reconcile;
pub mod scan;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
