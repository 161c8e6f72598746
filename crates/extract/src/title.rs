//! Title resolution.
//!
//! Candidates come from an ordered list of strategies; the first one whose
//! normalized text length is within `(0, max_title_chars]` wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config::ExtractConfig;
use crate::markup::{attr, text_of, TagIndex};

static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").expect("script pattern compiles")
});

/// Inputs every title strategy can look at.
pub struct TitleSources<'a> {
    /// Markup exactly as fetched. Only structured data is read from it.
    pub raw: &'a str,
    /// Markup with scripts, styles and comments removed.
    pub tags: &'a TagIndex<'a>,
}

type TitleStrategy = fn(&TitleSources<'_>) -> Option<String>;

/// Strategy priority order.
const STRATEGIES: &[(&str, TitleStrategy)] = &[
    ("og:title", open_graph_title),
    ("twitter:title", twitter_title),
    ("title", title_element),
    ("h1", first_h1),
    ("ld+json", linked_data_title),
];

/// Resolve the document title, falling back to `cfg.unknown_title`.
pub fn resolve_title(sources: &TitleSources<'_>, cfg: &ExtractConfig) -> String {
    for (name, strategy) in STRATEGIES {
        let Some(candidate) = strategy(sources) else {
            continue;
        };
        let len = candidate.chars().count();
        if len > 0 && len <= cfg.max_title_chars {
            debug!(strategy = name, "title_resolved");
            return candidate;
        }
        debug!(strategy = name, len, "title_candidate_rejected");
    }
    cfg.unknown_title().to_string()
}

fn meta_content(tags: &TagIndex<'_>, key: &str) -> Option<String> {
    tags.start_tags(|name, attrs| {
        name == "meta"
            && ["property", "name"].iter().any(|a| {
                attr(attrs, a).is_some_and(|v| v.trim().eq_ignore_ascii_case(key))
            })
    })
    .into_iter()
    .find_map(|(_, attrs)| attr(attrs, "content"))
    .map(|content| text_of(&content))
}

pub(crate) fn open_graph_title(sources: &TitleSources<'_>) -> Option<String> {
    meta_content(sources.tags, "og:title")
}

pub(crate) fn twitter_title(sources: &TitleSources<'_>) -> Option<String> {
    meta_content(sources.tags, "twitter:title")
}

pub(crate) fn title_element(sources: &TitleSources<'_>) -> Option<String> {
    sources
        .tags
        .by_name("title")
        .first()
        .map(|el| text_of(el.inner))
}

pub(crate) fn first_h1(sources: &TitleSources<'_>) -> Option<String> {
    sources
        .tags
        .by_name("h1")
        .first()
        .map(|el| text_of(el.inner))
}

pub(crate) fn linked_data_title(sources: &TitleSources<'_>) -> Option<String> {
    SCRIPT_RE.captures_iter(sources.raw).find_map(|caps| {
        let is_ld = attr(&caps[1], "type")
            .is_some_and(|t| t.to_ascii_lowercase().contains("ld+json"));
        if !is_ld {
            return None;
        }
        // Malformed structured data is common; skip it and keep looking.
        let value: Value = serde_json::from_str(caps[2].trim()).ok()?;
        find_headline(&value).map(|t| text_of(&t))
    })
}

fn find_headline(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            for key in ["headline", "name"] {
                if let Some(Value::String(s)) = map.get(key) {
                    if !s.trim().is_empty() {
                        return Some(s.clone());
                    }
                }
            }
            map.get("@graph").and_then(find_headline)
        }
        Value::Array(items) => items.iter().find_map(find_headline),
        _ => None,
    }
}
