//! Content region selection.
//!
//! Semantic elements are tried before class/id heuristics: a boilerplate div
//! called `main-wrapper` should never beat a real `<article>`.

use tracing::debug;

use crate::markup::{class_and_id, TagIndex};
use crate::types::RegionSource;

/// Elements eligible for the class/id token selectors.
const CONTAINER_TAGS: &[&str] = &["div", "section", "article", "main"];

#[derive(Debug, Clone, Copy)]
enum Selector {
    Tag(&'static str),
    Container(&'static str),
}

/// Priority order. The first selector with a non-empty match wins.
const SELECTORS: &[Selector] = &[
    Selector::Tag("article"),
    Selector::Tag("main"),
    Selector::Tag("section"),
    Selector::Container("content"),
    Selector::Container("article"),
    Selector::Container("post"),
    Selector::Container("main"),
    Selector::Container("body"),
    Selector::Container("text"),
    Selector::Container("container"),
    Selector::Container("wrapper"),
];

/// The selected region of a cleaned document.
#[derive(Debug, Clone)]
pub struct Region<'a> {
    pub source: RegionSource,
    pub html: &'a str,
}

/// Pick the content region of a cleaned document.
pub fn select_region<'a>(tags: &TagIndex<'a>) -> Region<'a> {
    for selector in SELECTORS {
        let candidates = match *selector {
            Selector::Tag(tag) => tags.by_name(tag),
            Selector::Container(token) => tags.elements(|name, attrs| {
                CONTAINER_TAGS.contains(&name) && class_and_id(attrs).contains(token)
            }),
        };

        // Most text wins; the first one wins ties.
        let mut best: Option<(usize, &'a str)> = None;
        for el in candidates {
            let weight = el.text_weight;
            if weight > 0 && best.map_or(true, |(best_weight, _)| weight > best_weight) {
                best = Some((weight, el.inner));
            }
        }

        if let Some((weight, html)) = best {
            let source = match *selector {
                Selector::Tag(tag) => RegionSource::SemanticTag { tag: tag.to_string() },
                Selector::Container(token) => RegionSource::ContainerToken {
                    token: token.to_string(),
                },
            };
            debug!(region = %source, text_weight = weight, "region_selected");
            return Region { source, html };
        }
    }

    if let Some(body) = tags.by_name("body").into_iter().next() {
        debug!("region_fallback_body");
        return Region {
            source: RegionSource::Body,
            html: body.inner,
        };
    }

    debug!("region_fallback_document");
    Region {
        source: RegionSource::Document,
        html: tags.html(),
    }
}
