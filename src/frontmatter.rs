//! Front-matter parsing from Markdown source text.
//!
//! A front-matter block is a run of `key: value` lines fenced by `---` lines
//! at the very top of a file:
//!
//! ```text
//! ---
//! title: Shipping the parser
//! tags: [rust, "parsing", 'notes']
//! draft: true
//! ---
//! Body starts here.
//! ```
//!
//! This is intentionally not YAML. Keys are case-insensitive, values are
//! either plain text or a bracketed comma list, and anything the blog does
//! not understand (like `draft` above) is kept but ignored.

const DELIMITER: &str = "---";

/// A value on the right-hand side of a front-matter line.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

/// Parsed front-matter block. Keys are stored trimmed and lower-cased, in
/// source order; a repeated key keeps its first value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    fields: Vec<(String, FieldValue)>,
}

impl FrontMatter {
    /// Look up a field by key (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        let key = key.to_ascii_lowercase();
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// All keys in source order, including ones the blog ignores.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// The `title` field, if present and not blank.
    ///
    /// A list value is joined back with `, ` since a title is always text.
    pub fn title(&self) -> Option<String> {
        let title = match self.get("title")? {
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items.join(", "),
        };
        if title.trim().is_empty() {
            None
        } else {
            Some(title)
        }
    }

    /// The `tags` field as a list, if the key is present at all.
    ///
    /// A plain text value is split on commas. Present-but-empty yields an
    /// empty list rather than `None`.
    pub fn tags(&self) -> Option<Vec<String>> {
        Some(match self.get("tags")? {
            FieldValue::List(items) => items.clone(),
            FieldValue::Text(text) => split_list(text),
        })
    }

    fn insert(&mut self, key: String, value: FieldValue) {
        if self.get(&key).is_none() {
            self.fields.push((key, value));
        }
    }
}

/// Split `text` into an optional front-matter block and the remaining body.
///
/// Front-matter is only recognized when the first line is exactly `---` and a
/// later line is exactly `---` (trailing whitespace ignored, so CRLF files
/// work). Otherwise the whole input is returned as the body.
pub fn split_front_matter(text: &str) -> (Option<FrontMatter>, &str) {
    let mut lines = LineSpans::new(text);
    let Some((_, first)) = lines.next() else {
        return (None, text);
    };
    if first.trim_end() != DELIMITER {
        return (None, text);
    }

    let mut front_matter = FrontMatter::default();
    for (start, line) in lines {
        if line.trim_end() == DELIMITER {
            let body_start = (start + line.len() + 1).min(text.len());
            return (Some(front_matter), &text[body_start..]);
        }
        if let Some((key, value)) = parse_field(line) {
            front_matter.insert(key, value);
        }
    }

    // Opening delimiter without a closing one: not front-matter.
    (None, text)
}

fn parse_field(line: &str) -> Option<(String, FieldValue)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim().to_ascii_lowercase();
    if key.is_empty() {
        return None;
    }
    let value = value.trim();
    let value = match value
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
    {
        Some(inner) => FieldValue::List(split_list(inner)),
        None => FieldValue::Text(unquote(value).to_string()),
    };
    Some((key, value))
}

/// Split a comma list, trimming and unquoting each item and dropping empties.
pub(crate) fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|item| unquote(item.trim()).trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip one matching pair of surrounding `"` or `'` quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Iterator over `(byte_offset, line)` pairs, where `line` excludes the `\n`.
struct LineSpans<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> LineSpans<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for LineSpans<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.text[start..];
        let line = match rest.find('\n') {
            Some(end) => &rest[..end],
            None => rest,
        };
        self.pos = start + line.len() + 1;
        Some((start, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_title_and_list_tags() {
        let text = "---\ntitle: Hello\ntags: [a, \"b\", 'c']\n---\nBody.\n";
        let (fm, body) = split_front_matter(text);
        let fm = fm.unwrap();
        assert_eq!(fm.title().as_deref(), Some("Hello"));
        assert_eq!(fm.tags().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(body, "Body.\n");
    }

    #[test]
    fn comma_string_tags() {
        let (fm, _) = split_front_matter("---\ntags: rust, web ,  cli\n---\nx");
        assert_eq!(fm.unwrap().tags().unwrap(), vec!["rust", "web", "cli"]);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let (fm, _) = split_front_matter("---\nTitle: Upper\nTAGS: [x]\n---\nx");
        let fm = fm.unwrap();
        assert_eq!(fm.title().as_deref(), Some("Upper"));
        assert_eq!(fm.tags().unwrap(), vec!["x"]);
    }

    #[test]
    fn value_may_contain_colons() {
        let (fm, _) = split_front_matter("---\ntitle: Rust: the good parts\n---\nx");
        assert_eq!(fm.unwrap().title().as_deref(), Some("Rust: the good parts"));
    }

    #[test]
    fn quoted_title_is_unquoted() {
        let (fm, _) = split_front_matter("---\ntitle: \"Quoted\"\n---\nx");
        assert_eq!(fm.unwrap().title().as_deref(), Some("Quoted"));
    }

    #[test]
    fn unknown_keys_are_retained() {
        let (fm, _) = split_front_matter("---\ndraft: true\ntitle: T\n---\nx");
        let fm = fm.unwrap();
        assert_eq!(fm.get("draft"), Some(&FieldValue::Text("true".into())));
        assert_eq!(fm.keys().collect::<Vec<_>>(), vec!["draft", "title"]);
    }

    #[test]
    fn lines_without_colon_are_ignored() {
        let (fm, _) = split_front_matter("---\njust text\ntitle: T\n---\nx");
        assert_eq!(fm.unwrap().keys().count(), 1);
    }

    #[test]
    fn no_front_matter_without_leading_delimiter() {
        let text = "# Title\n---\ntitle: nope\n---\n";
        let (fm, body) = split_front_matter(text);
        assert!(fm.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn unclosed_block_is_not_front_matter() {
        let text = "---\ntitle: Dangling\nBody";
        let (fm, body) = split_front_matter(text);
        assert!(fm.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn crlf_delimiters_are_recognized() {
        let (fm, body) = split_front_matter("---\r\ntitle: Win\r\n---\r\nBody\r\n");
        assert_eq!(fm.unwrap().title().as_deref(), Some("Win"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn empty_block_parses() {
        let (fm, body) = split_front_matter("---\n---\nBody");
        assert_eq!(fm.unwrap(), FrontMatter::default());
        assert_eq!(body, "Body");
    }

    #[test]
    fn closing_delimiter_at_end_of_input() {
        let (fm, body) = split_front_matter("---\ntitle: Only\n---");
        assert_eq!(fm.unwrap().title().as_deref(), Some("Only"));
        assert_eq!(body, "");
    }

    #[test]
    fn blank_title_is_absent() {
        let (fm, _) = split_front_matter("---\ntitle:   \n---\nx");
        assert_eq!(fm.unwrap().title(), None);
    }

    #[test]
    fn present_but_empty_tags_is_empty_list() {
        let (fm, _) = split_front_matter("---\ntags: []\n---\nx");
        assert_eq!(fm.unwrap().tags(), Some(vec![]));
    }

    #[test]
    fn missing_tags_is_none() {
        let (fm, _) = split_front_matter("---\ntitle: T\n---\nx");
        assert_eq!(fm.unwrap().tags(), None);
    }
}
