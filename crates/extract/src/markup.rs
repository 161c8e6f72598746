//! Regex-driven markup scanning.
//!
//! There is no DOM here. [`TagIndex`] lexes every start and end tag once,
//! pairs each start tag with its end tag in the same pass, and answers
//! element queries from that table. Anything the lexer cannot recognise is
//! treated as text. Building the index and every query are linear in the
//! input, however deeply it nests.

use std::collections::HashMap;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::decode_entities;

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9:-]*)([^<>]*)>").expect("tag pattern compiles")
});

static ANY_MARKUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?:/?[A-Za-z][^<>]*|![^<>]*|\?[^<>]*)>").expect("markup pattern compiles")
});

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("attribute pattern compiles")
});

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern compiles"));

static RAW_TEXT_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<noscript\b[^>]*>.*?</noscript\s*>|<template\b[^>]*>.*?</template\s*>",
    )
    .expect("raw text block pattern compiles")
});

// An unclosed script/style/comment swallows the rest of the document, as a
// browser would.
static UNCLOSED_TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)(?:<!--|<(?:script|style|noscript|template)\b[^>]*>).*\z")
        .expect("unclosed tail pattern compiles")
});

/// Elements whose end tag is routinely omitted by authors.
const IMPLICIT_END: &[&str] = &["p", "li", "dt", "dd", "tr", "td", "th", "option"];

/// Remove comments and script, style, noscript and template blocks.
pub fn strip_noise(html: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(html, " ");
    let without_blocks = RAW_TEXT_BLOCK_RE.replace_all(&without_comments, " ");
    UNCLOSED_TAIL_RE.replace_all(&without_blocks, " ").into_owned()
}

/// Replace every tag, doctype, comment remnant or processing instruction
/// with a space.
pub fn strip_tags(html: &str) -> String {
    ANY_MARKUP_RE.replace_all(html, " ").into_owned()
}

/// Tag-stripped, entity-decoded, single-line text of a fragment.
pub fn text_of(html: &str) -> String {
    let stripped = strip_tags(html);
    canonical::collapse_whitespace(&decode_entities(&stripped))
}

/// Character length of [`text_of`].
pub fn text_len(html: &str) -> usize {
    text_of(html).chars().count()
}

/// Value of attribute `name` (ASCII case-insensitive) in a raw attribute string.
pub fn attr(attrs: &str, name: &str) -> Option<String> {
    ATTR_RE.captures_iter(attrs).find_map(|caps| {
        let key = caps.get(1)?.as_str();
        if !key.eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().to_string())
    })
}

/// Lowercased `class` and `id` values joined by a space.
pub fn class_and_id(attrs: &str) -> String {
    let mut out = String::new();
    for name in ["class", "id"] {
        if let Some(value) = attr(attrs, name) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&value.to_ascii_lowercase());
        }
    }
    out
}

/// Remove byte ranges from `html`, merging overlaps. Each removed range is
/// replaced by a newline so neighbouring text does not fuse.
pub fn remove_ranges(html: &str, ranges: &[Range<usize>]) -> String {
    if ranges.is_empty() {
        return html.to_string();
    }
    let mut sorted: Vec<Range<usize>> = ranges.to_vec();
    sorted.sort_by_key(|r| (r.start, std::cmp::Reverse(r.end)));

    let mut out = String::with_capacity(html.len());
    let mut cursor = 0usize;
    for range in sorted {
        if range.end <= cursor {
            continue;
        }
        let start = range.start.max(cursor);
        out.push_str(&html[cursor..start]);
        out.push('\n');
        cursor = range.end;
    }
    out.push_str(&html[cursor..]);
    out
}

#[derive(Debug, Clone)]
struct Tag<'a> {
    span: Range<usize>,
    closing: bool,
    self_closing: bool,
    name: String,
    attrs: &'a str,
}

/// One matched element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    /// Lowercased tag name.
    pub name: String,
    /// Raw attribute text of the start tag.
    pub attrs: &'a str,
    /// Markup between the start tag and its matching end tag.
    pub inner: &'a str,
    /// Byte range of the whole element, tags included.
    pub outer: Range<usize>,
    /// Summed [`text_len`] of the text runs between the element's tags. Never
    /// more than `text_len(inner)`.
    pub text_weight: usize,
}

/// Where a start tag's content stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    /// Matching end tag at this index.
    Close(usize),
    /// Omitted end tag; content stops before the tag at this index.
    Before(usize),
    /// Unbalanced; content runs to the end of input.
    Eof,
}

/// Every tag of a document, lexed once.
pub struct TagIndex<'a> {
    html: &'a str,
    tags: Vec<Tag<'a>>,
    ends: Vec<End>,
    /// `text_before[i]`: text weight of the input before tag `i`; the last
    /// entry covers the whole input.
    text_before: Vec<usize>,
}

impl<'a> TagIndex<'a> {
    pub fn new(html: &'a str) -> Self {
        let tags = TAG_RE
            .captures_iter(html)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let attrs = caps.get(3).map_or("", |m| m.as_str());
                Some(Tag {
                    span: whole.range(),
                    closing: !caps[1].is_empty(),
                    self_closing: attrs.trim_end().ends_with('/'),
                    name: caps[2].to_ascii_lowercase(),
                    attrs,
                })
            })
            .collect::<Vec<_>>();
        let ends = pair_tags(&tags);
        let text_before = text_prefix(html, &tags);
        Self {
            html,
            tags,
            ends,
            text_before,
        }
    }

    pub fn html(&self) -> &'a str {
        self.html
    }

    /// Start tags matching `pred`, without looking for end tags. Suited to
    /// void elements such as `<meta>`.
    pub fn start_tags<F>(&self, mut pred: F) -> Vec<(&str, &'a str)>
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.tags
            .iter()
            .filter(|t| !t.closing && pred(&t.name, t.attrs))
            .map(|t| (t.name.as_str(), t.attrs))
            .collect()
    }

    /// Elements (in document order) whose start tag matches `pred`.
    pub fn elements<F>(&self, mut pred: F) -> Vec<Element<'a>>
    where
        F: FnMut(&str, &str) -> bool,
    {
        let mut out = Vec::new();
        for (idx, tag) in self.tags.iter().enumerate() {
            if tag.closing || !pred(&tag.name, tag.attrs) {
                continue;
            }
            out.push(self.element_at(idx));
        }
        out
    }

    /// Convenience for `elements` filtered on a single tag name.
    pub fn by_name(&self, name: &str) -> Vec<Element<'a>> {
        self.elements(|n, _| n == name)
    }

    fn element_at(&self, idx: usize) -> Element<'a> {
        let open = &self.tags[idx];
        if open.self_closing {
            return Element {
                name: open.name.clone(),
                attrs: open.attrs,
                inner: "",
                outer: open.span.clone(),
                text_weight: 0,
            };
        }

        let (inner_end, outer_end, boundary) = match self.ends[idx] {
            End::Close(close) => {
                let span = &self.tags[close].span;
                (span.start, span.end, close)
            }
            End::Before(next) => {
                let start = self.tags[next].span.start;
                (start, start, next)
            }
            End::Eof => (self.html.len(), self.html.len(), self.tags.len()),
        };
        Element {
            name: open.name.clone(),
            attrs: open.attrs,
            inner: &self.html[open.span.end..inner_end],
            outer: open.span.start..outer_end,
            text_weight: self.text_before[boundary] - self.text_before[idx],
        }
    }
}

/// Pair start and end tags with one stack per tag name.
///
/// Unmatched optional-end elements stop at the next tag of the same name;
/// every other unmatched start tag runs to the end of input.
fn pair_tags(tags: &[Tag<'_>]) -> Vec<End> {
    let mut ends = vec![End::Eof; tags.len()];
    let mut open: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, tag) in tags.iter().enumerate() {
        if tag.self_closing {
            continue;
        }
        let stack = open.entry(tag.name.as_str()).or_default();
        if !tag.closing {
            stack.push(idx);
        } else if let Some(start) = stack.pop() {
            ends[start] = End::Close(idx);
        }
    }

    let mut next_same: HashMap<&str, usize> = HashMap::new();
    for (idx, tag) in tags.iter().enumerate().rev() {
        if ends[idx] == End::Eof
            && !tag.closing
            && !tag.self_closing
            && IMPLICIT_END.contains(&tag.name.as_str())
        {
            if let Some(&next) = next_same.get(tag.name.as_str()) {
                ends[idx] = End::Before(next);
            }
        }
        next_same.insert(tag.name.as_str(), idx);
    }
    ends
}

fn text_prefix(html: &str, tags: &[Tag<'_>]) -> Vec<usize> {
    let mut out = Vec::with_capacity(tags.len() + 1);
    let mut total = 0usize;
    let mut cursor = 0usize;
    for tag in tags {
        total += text_len(&html[cursor..tag.span.start]);
        out.push(total);
        cursor = tag.span.end;
    }
    total += text_len(&html[cursor..]);
    out.push(total);
    out
}
