//! Excerpt splitting and plain-text summaries

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// A post body split at its excerpt marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Excerpt<'a> {
    /// Body text before the first marker, or the whole body without one
    pub excerpt: &'a str,
    /// The full body, whatever the marker
    pub body: &'a str,
    /// Text after the marker
    pub more: Option<&'a str>,
}

impl Excerpt<'_> {
    pub fn is_truncated(&self) -> bool {
        self.more.is_some()
    }
}

/// Split `body` at the first occurrence of `marker`.
///
/// Nothing is trimmed: `excerpt` is exactly `&body[..pos]`. An empty marker
/// never matches.
pub fn split_excerpt<'a>(body: &'a str, marker: &str) -> Excerpt<'a> {
    let found = if marker.is_empty() {
        None
    } else {
        body.find(marker)
    };

    match found {
        Some(pos) => Excerpt {
            excerpt: &body[..pos],
            body,
            more: Some(&body[pos + marker.len()..]),
        },
        None => Excerpt {
            excerpt: body,
            body,
            more: None,
        },
    }
}

/// Plain text of a markdown fragment, cut to `max_chars` characters.
///
/// Code blocks and raw HTML are dropped.
pub fn summarize(markdown: &str, max_chars: usize) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(markdown, options);

    let mut text = String::new();
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                text.push(' ');
            }
            Event::Text(t) | Event::Code(t) if !in_code_block => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => text.push(' '),
            _ => {}
        }
    }

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, max_chars)
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((cut, _)) => {
            let mut out = s[..cut].trim_end().to_string();
            out.push('…');
            out
        }
    }
}
