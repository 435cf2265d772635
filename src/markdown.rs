//! Markdown to HTML conversion for entry pages.
//!
//! Wraps [`pulldown_cmark`] with the rendering rules blog entries expect:
//!
//! - **GFM extensions**: tables, strikethrough, task lists and footnotes.
//! - **Line breaks**: a single newline inside a paragraph becomes `<br />`,
//!   so entries written as plain prose keep their line structure.
//! - **Autolinks**: bare `http://`, `https://` and `www.` URLs in text become
//!   links. Text inside links (Markdown or raw `<a>`), images and code is
//!   left alone.
//! - **Heading anchors**: every heading gets a GitHub-style `id`
//!   (`## Hello, World!` → `id="hello-world"`), de-duplicated with `-1`,
//!   `-2`, ... suffixes. Explicit `{#id}` attributes win.
//!
//! Email addresses are emitted as written. There is no obfuscation.
//!
//! The output is trusted: the page renderer inserts it without escaping.

use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream, html};
use std::collections::HashSet;

const URL_PREFIXES: [&str; 3] = ["https://", "http://", "www."];

/// Render Markdown to an HTML fragment.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let parser = TextMergeStream::new(Parser::new_ext(markdown, options));
    let events = anchor_headings(autolink(parser));

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

// ============================================================================
// Event rewriting
// ============================================================================

/// Turn soft breaks into hard breaks and bare URLs in text into links.
fn autolink<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    // Depth of enclosing links/images/code blocks, where text must stay text.
    let mut opaque_depth = 0usize;

    for event in events {
        match event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                opaque_depth += 1;
                out.push(event);
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                opaque_depth = opaque_depth.saturating_sub(1);
                out.push(event);
            }
            Event::InlineHtml(ref html) => {
                match raw_anchor(html) {
                    Some(true) => opaque_depth += 1,
                    Some(false) => opaque_depth = opaque_depth.saturating_sub(1),
                    None => {}
                }
                out.push(event);
            }
            Event::SoftBreak => out.push(Event::HardBreak),
            Event::Text(text) if opaque_depth == 0 => linkify(&text, &mut out),
            other => out.push(other),
        }
    }
    out
}

/// `Some(true)` for an inline `<a ...>` tag, `Some(false)` for `</a>`.
fn raw_anchor(html: &str) -> Option<bool> {
    let tag = html.trim_start().to_ascii_lowercase();
    let (rest, opening) = match tag.strip_prefix("</a") {
        Some(rest) => (rest, false),
        None => (tag.strip_prefix("<a")?, true),
    };
    rest.starts_with(|c: char| c == '>' || c.is_ascii_whitespace())
        .then_some(opening)
}

fn linkify<'a>(text: &str, out: &mut Vec<Event<'a>>) {
    let mut rest = text;
    while let Some((start, end)) = find_url(rest) {
        if start > 0 {
            out.push(Event::Text(CowStr::from(rest[..start].to_string())));
        }
        let url = &rest[start..end];
        let dest = if url.starts_with("www.") {
            format!("http://{url}")
        } else {
            url.to_string()
        };
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(dest),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        out.push(Event::Text(CowStr::from(url.to_string())));
        out.push(Event::End(TagEnd::Link));
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        out.push(Event::Text(CowStr::from(rest.to_string())));
    }
}

/// Byte range of the first bare URL in `text`.
fn find_url(text: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    while from < text.len() {
        let (start, prefix) = URL_PREFIXES
            .iter()
            .filter_map(|p| text[from..].find(p).map(|i| (from + i, *p)))
            .min_by_key(|&(i, _)| i)?;

        let at_boundary = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace() || "(*_~\"'".contains(c));
        let raw_end = text[start..]
            .find(|c: char| c.is_whitespace() || c == '<')
            .map_or(text.len(), |i| start + i);
        let end = start + trim_url_tail(&text[start..raw_end]).len();

        if at_boundary && end > start + prefix.len() {
            return Some((start, end));
        }
        from = start + prefix.len();
    }
    None
}

/// Drop trailing punctuation that belongs to the sentence, not the URL.
fn trim_url_tail(url: &str) -> &str {
    let mut url = url;
    while let Some(last) = url.chars().next_back() {
        let strip = match last {
            '?' | '!' | '.' | ',' | ':' | ';' | '*' | '_' | '~' | '\'' | '"' => true,
            ')' => url.matches(')').count() > url.matches('(').count(),
            _ => false,
        };
        if !strip {
            break;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
    url
}

/// Assign an anchor id to every heading that lacks one.
fn anchor_headings(mut events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut used: HashSet<String> = events
        .iter()
        .filter_map(|event| match event {
            Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
            _ => None,
        })
        .collect();

    for i in 0..events.len() {
        let Event::Start(Tag::Heading { id: None, .. }) = &events[i] else {
            continue;
        };
        let base = anchor_id(&heading_text(&events[i + 1..]));
        if base.is_empty() {
            continue;
        }

        let mut anchor = base.clone();
        let mut n = 0;
        while used.contains(&anchor) {
            n += 1;
            anchor = format!("{base}-{n}");
        }
        used.insert(anchor.clone());

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(anchor));
        }
    }
    events
}

fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// GitHub-style anchor: lower-cased, spaces to `-`, punctuation dropped.
pub fn anchor_id(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}
