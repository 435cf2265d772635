//! HTML page generation.
//!
//! Second stage of the build: takes the entries from [`crate::scan`], fills
//! the site author's templates and writes the static pages.
//!
//! ## Generated Pages
//!
//! - **Index page** (`index.html`): owner header, tag-filter buttons and a
//!   JSON blob of every entry for the client-side listing and search
//! - **Entry pages** (`entry-<slug>.html`): one per entry, with the Markdown
//!   content rendered to HTML
//!
//! ## Output Structure
//!
//! ```text
//! _site/
//! ├── index.html
//! ├── entry-hello-world.html
//! ├── entry-legacy-post.html
//! └── ...
//! ```
//!
//! Pages contain no timestamps, so rebuilding unchanged sources produces
//! byte-identical files.
//!
//! ## Escaping
//!
//! Author-controlled text (owner name, titles, tags) is escaped on the way in
//! through [`Slots::text`] or maud's auto-escaping. Rendered Markdown is the
//! only trusted markup. The entries JSON escapes `<`, `>` and `&` as unicode
//! escapes so it cannot close the `<script>` element it is embedded in.

use crate::config::BlogConfig;
use crate::markdown;
use crate::template::{self, Slots, Template, Templates};
use crate::types::{Entry, IndexSummary};
use maud::{Markup, html};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Characters of raw Markdown kept in each index summary.
pub const PREVIEW_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Renders entries into pages using the loaded templates and owner config.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    templates: Templates,
    config: BlogConfig,
}

impl PageRenderer {
    pub fn new(templates: Templates, config: BlogConfig) -> Self {
        Self { templates, config }
    }

    pub fn render_index(&self, entries: &[Entry]) -> Result<String, GenerateError> {
        let summaries = index_summaries(entries);
        let slots = self
            .owner_slots()
            .html(template::ENTRIES_JSON, entries_json(&summaries)?)
            .html(template::TAG_BUTTONS, render_tag_buttons(entries).into_string());
        Ok(fill(&self.templates.index, &slots, template::INDEX_TEMPLATE))
    }

    pub fn render_entry(&self, entry: &Entry) -> String {
        let slots = self
            .owner_slots()
            .text(template::ENTRY_TITLE, &entry.title)
            .html(template::ENTRY_CONTENT, markdown::to_html(&entry.content))
            .html(template::ENTRY_TAGS, render_entry_tags(&entry.tags).into_string());
        fill(&self.templates.entry, &slots, template::ENTRY_TEMPLATE)
    }

    /// Write `index.html` and every entry page into `output_dir`.
    ///
    /// Returns the written paths, index first.
    pub fn write_site(
        &self,
        entries: &[Entry],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, GenerateError> {
        fs::create_dir_all(output_dir)?;
        let mut written = Vec::with_capacity(entries.len() + 1);

        let index_path = output_dir.join(template::INDEX_TEMPLATE);
        fs::write(&index_path, self.render_index(entries)?)?;
        debug!(path = %index_path.display(), "wrote index page");
        written.push(index_path);

        for entry in entries {
            let path = output_dir.join(&entry.output_url);
            fs::write(&path, self.render_entry(entry))?;
            debug!(path = %path.display(), "wrote entry page");
            written.push(path);
        }

        info!(
            pages = written.len(),
            output = %output_dir.display(),
            "site generated"
        );
        Ok(written)
    }

    fn owner_slots(&self) -> Slots {
        Slots::new()
            .text(template::OWNER_NAME, &self.config.owner.name)
            .text(template::OWNER_PICTURE, &self.config.owner.picture)
    }
}

fn fill(template: &Template, slots: &Slots, name: &str) -> String {
    for token in template.unresolved(slots) {
        warn!(template = name, %token, "placeholder has no value");
    }
    template.render(slots)
}

// ============================================================================
// Index page data
// ============================================================================

/// Summaries for the index page, in entry order.
pub fn index_summaries(entries: &[Entry]) -> Vec<IndexSummary> {
    entries
        .iter()
        .map(|entry| IndexSummary {
            title: entry.title.clone(),
            tags: entry.tags.clone(),
            url: entry.output_url.clone(),
            content: entry.content.chars().take(PREVIEW_CHARS).collect(),
        })
        .collect()
}

/// Serialize summaries as JSON that is safe to embed in a `<script>` element.
pub fn entries_json(summaries: &[IndexSummary]) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(summaries)?;
    // These characters only occur inside JSON strings, where the escapes
    // decode to the same text.
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Distinct tags across all entries, sorted.
pub fn all_tags(entries: &[Entry]) -> BTreeSet<&str> {
    entries
        .iter()
        .flat_map(|entry| entry.tags.iter().map(String::as_str))
        .collect()
}

/// One filter button per distinct tag.
pub fn render_tag_buttons(entries: &[Entry]) -> Markup {
    html! {
        @for tag in all_tags(entries) {
            button.tag-filter type="button" onclick=(format!("filterByTag('{}')", js_escape(tag))) {
                (tag)
            }
        }
    }
}

/// Tag list shown on an entry page. Empty when the entry has no tags.
pub fn render_entry_tags(tags: &[String]) -> Markup {
    html! {
        @for tag in tags {
            span.entry-tag { (tag) }
        }
    }
}

/// Escape text for a single-quoted JavaScript string literal.
fn js_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OwnerConfig;
    use crate::naming;
    use tempfile::TempDir;

    const INDEX: &str = "<h1>{{BLOG_OWNER_NAME}}</h1><img src=\"{{BLOG_OWNER_PICTURE}}\">\
<nav><!-- Tags will be populated by build script --></nav>\
<script>const entries = {{ENTRIES_JSON}};</script>";
    const ENTRY: &str = "<title>{{ENTRY_TITLE}}</title><p>{{BLOG_OWNER_NAME}}</p>\
<div class=\"tags\">{{ENTRY_TAGS}}</div><article>{{ENTRY_CONTENT}}</article>";

    fn entry(slug: &str, title: &str, tags: &[&str], content: &str) -> Entry {
        Entry {
            source_filename: format!("{slug}.md"),
            slug: slug.to_string(),
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            content: content.to_string(),
            output_url: naming::output_url(slug),
        }
    }

    fn renderer(owner: &str) -> PageRenderer {
        let templates = Templates {
            index: Template::from_source(INDEX),
            entry: Template::from_source(ENTRY),
        };
        let config = BlogConfig {
            owner: OwnerConfig {
                name: owner.to_string(),
                picture: "me.jpg".to_string(),
            },
        };
        PageRenderer::new(templates, config)
    }

    #[test]
    fn index_contains_owner_and_json() {
        let entries = vec![entry("a", "Hello", &["x", "y"], "# Hello\nBody")];
        let html = renderer("Ada").render_index(&entries).unwrap();

        assert!(html.contains("<h1>Ada</h1>"));
        assert!(html.contains("src=\"me.jpg\""));
        assert!(html.contains(r#""url":"entry-a.html""#));
        assert!(html.contains(r#""tags":["x","y"]"#));
        assert!(!html.contains("{{ENTRIES_JSON}}"));
    }

    #[test]
    fn owner_name_is_escaped() {
        let html = renderer("<script>").render_index(&[]).unwrap();
        assert!(html.contains("<h1>&lt;script&gt;</h1>"));
        assert!(!html.contains("<h1><script>"));
    }

    #[test]
    fn entries_json_cannot_close_script() {
        let entries = vec![entry("a", "</script><b>", &[], "a & b")];
        let html = renderer("Ada").render_index(&entries).unwrap();

        assert!(!html.contains("</script><b>"));
        assert!(html.contains(r"\u003c/script\u003e\u003cb\u003e"));
        assert!(html.contains(r"a \u0026 b"));
    }

    #[test]
    fn entries_json_round_trips_through_escapes() {
        let summaries = index_summaries(&[entry("a", "<T>", &["&"], "x")]);
        let json = entries_json(&summaries).unwrap();
        let parsed: Vec<IndexSummary> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summaries);
    }

    #[test]
    fn preview_is_first_200_characters() {
        let long = "é".repeat(250);
        let summaries = index_summaries(&[entry("a", "A", &[], &long)]);
        assert_eq!(summaries[0].content.chars().count(), 200);
        assert!(long.starts_with(&summaries[0].content));

        let short = index_summaries(&[entry("b", "B", &[], "short")]);
        assert_eq!(short[0].content, "short");
    }

    #[test]
    fn tag_buttons_are_sorted_and_unique() {
        let entries = vec![
            entry("a", "A", &["rust", "cli"], "a"),
            entry("b", "B", &["cli", "async"], "b"),
        ];
        let html = render_tag_buttons(&entries).into_string();

        assert_eq!(html.matches("<button").count(), 3);
        let async_at = html.find(">async<").unwrap();
        let cli_at = html.find(">cli<").unwrap();
        let rust_at = html.find(">rust<").unwrap();
        assert!(async_at < cli_at && cli_at < rust_at);
        assert!(html.contains(r#"class="tag-filter""#));
        assert!(html.contains(r#"onclick="filterByTag('rust')""#));
    }

    #[test]
    fn tag_button_escapes_quotes_and_markup() {
        let entries = vec![entry("a", "A", &["it's <b>\"x\""], "a")];
        let html = render_tag_buttons(&entries).into_string();

        assert!(html.contains(r#"onclick="filterByTag('it\'s &lt;b&gt;&quot;x&quot;')""#));
        assert!(html.contains(">it's &lt;b&gt;&quot;x&quot;</button>"));
    }

    #[test]
    fn no_tags_renders_no_buttons() {
        let entries = vec![entry("a", "A", &[], "a")];
        assert_eq!(render_tag_buttons(&entries).into_string(), "");
    }

    #[test]
    fn entry_page_renders_markdown_and_escapes_title() {
        let e = entry("a", "Fish & Chips", &["food"], "# Fish & Chips\n\n**crispy**");
        let html = renderer("Ada").render_entry(&e);

        assert!(html.contains("<title>Fish &amp; Chips</title>"));
        assert!(html.contains("<strong>crispy</strong>"));
        assert!(html.contains("<p>Ada</p>"));
        assert!(html.contains(r#"<span class="entry-tag">food</span>"#));
    }

    #[test]
    fn entry_content_is_not_rescanned_for_placeholders() {
        let e = entry("a", "A", &[], "Use `{{BLOG_OWNER_NAME}}` in templates.");
        let html = renderer("Ada").render_entry(&e);
        assert!(html.contains("<code>{{BLOG_OWNER_NAME}}</code>"));
    }

    #[test]
    fn write_site_writes_index_and_entries() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("_site");
        let entries = vec![entry("a", "A", &[], "# A"), entry("b", "B", &[], "# B")];

        let written = renderer("Ada").write_site(&entries, &out).unwrap();

        assert_eq!(
            written,
            vec![
                out.join("index.html"),
                out.join("entry-a.html"),
                out.join("entry-b.html"),
            ]
        );
        for path in &written {
            assert!(path.is_file(), "{} not written", path.display());
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let entries = vec![entry("a", "A", &["t"], "# A\nhttps://example.com")];
        let r = renderer("Ada");
        assert_eq!(
            r.render_index(&entries).unwrap(),
            r.render_index(&entries).unwrap()
        );
        assert_eq!(r.render_entry(&entries[0]), r.render_entry(&entries[0]));
    }

    #[test]
    fn js_escape_handles_specials() {
        assert_eq!(js_escape(r"a\b'c"), r"a\\b\'c");
        assert_eq!(js_escape("l1\nl2\r"), r"l1\nl2\r");
    }
}
