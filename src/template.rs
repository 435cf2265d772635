//! Placeholder substitution for the HTML templates.
//!
//! Templates are plain HTML files owned by the site author. The build fills
//! named slots in them:
//!
//! | Token                                             | Page  | Value           |
//! |---------------------------------------------------|-------|-----------------|
//! | `{{BLOG_OWNER_NAME}}`                             | both  | escaped text    |
//! | `{{BLOG_OWNER_PICTURE}}`                          | both  | escaped text    |
//! | `{{ENTRIES_JSON}}`                                | index | script-safe JSON|
//! | `<!-- Tags will be populated by build script -->` | index | tag buttons     |
//! | `{{ENTRY_TITLE}}`                                 | entry | escaped text    |
//! | `{{ENTRY_CONTENT}}`                               | entry | rendered HTML   |
//! | `{{ENTRY_TAGS}}`                                  | entry | tag list markup |
//!
//! Every value goes through [`Slots`], which records whether it is text to be
//! escaped or markup to be inserted verbatim. Substitution is a single
//! left-to-right pass, so a value that happens to contain a token is never
//! expanded again.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const OWNER_NAME: &str = "{{BLOG_OWNER_NAME}}";
pub const OWNER_PICTURE: &str = "{{BLOG_OWNER_PICTURE}}";
pub const ENTRIES_JSON: &str = "{{ENTRIES_JSON}}";
pub const TAG_BUTTONS: &str = "<!-- Tags will be populated by build script -->";
pub const ENTRY_TITLE: &str = "{{ENTRY_TITLE}}";
pub const ENTRY_CONTENT: &str = "{{ENTRY_CONTENT}}";
pub const ENTRY_TAGS: &str = "{{ENTRY_TAGS}}";

pub const INDEX_TEMPLATE: &str = "index.html";
pub const ENTRY_TEMPLATE: &str = "entry.html";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Values to substitute into a template, keyed by their literal token.
#[derive(Debug, Clone, Default)]
pub struct Slots {
    values: Vec<(String, String)>,
}

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text; HTML-escaped on insertion.
    pub fn text(self, token: &str, value: &str) -> Self {
        self.insert(token, escape_html(value))
    }

    /// Trusted markup, inserted verbatim.
    pub fn html(self, token: &str, value: impl Into<String>) -> Self {
        self.insert(token, value.into())
    }

    fn insert(mut self, token: &str, value: String) -> Self {
        if token.is_empty() {
            return self;
        }
        match self.values.iter_mut().find(|(t, _)| t == token) {
            Some(slot) => slot.1 = value,
            None => self.values.push((token.to_string(), value)),
        }
        self
    }

    fn contains(&self, token: &str) -> bool {
        self.values.iter().any(|(t, _)| t == token)
    }
}

/// A loaded template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        if !path.is_file() {
            return Err(TemplateError::Missing(path.to_path_buf()));
        }
        Ok(Self::from_source(fs::read_to_string(path)?))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace every occurrence of every slot token. Tokens without a slot
    /// are left as written.
    pub fn render(&self, slots: &Slots) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source.as_str();

        loop {
            let next = slots
                .values
                .iter()
                .filter_map(|(token, value)| rest.find(token.as_str()).map(|i| (i, token, value)))
                .min_by_key(|&(i, _, _)| i);
            let Some((at, token, value)) = next else {
                out.push_str(rest);
                break;
            };
            out.push_str(&rest[..at]);
            out.push_str(value);
            rest = &rest[at + token.len()..];
        }
        out
    }

    /// `{{NAME}}` tokens in the template that `slots` does not fill, in
    /// order of first appearance.
    pub fn unresolved(&self, slots: &Slots) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for token in placeholder_tokens(&self.source) {
            if !slots.contains(token) && !missing.iter().any(|m| m == token) {
                missing.push(token.to_string());
            }
        }
        missing
    }
}

/// Find `{{NAME}}` tokens where `NAME` is upper-case ASCII, digits or `_`.
fn placeholder_tokens(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    let mut offset = 0;
    std::iter::from_fn(move || {
        loop {
            let open = rest.find("{{")?;
            let after = &rest[open + 2..];
            let close = after.find("}}");
            let token_len = close.filter(|&len| {
                len > 0
                    && after[..len]
                        .bytes()
                        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
            });
            match token_len {
                Some(len) => {
                    let start = offset + open;
                    let end = start + len + 4;
                    offset = end;
                    rest = &text[end..];
                    return Some(&text[start..end]);
                }
                None => {
                    offset += open + 2;
                    rest = &text[offset..];
                }
            }
        }
    })
}

/// The pair of templates a build needs.
#[derive(Debug, Clone)]
pub struct Templates {
    pub index: Template,
    pub entry: Template,
}

impl Templates {
    /// Load `index.html` and `entry.html` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        Ok(Self {
            index: Template::load(&dir.join(INDEX_TEMPLATE))?,
            entry: Template::load(&dir.join(ENTRY_TEMPLATE))?,
        })
    }
}

/// Escape `& < > " '` for use in HTML text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
