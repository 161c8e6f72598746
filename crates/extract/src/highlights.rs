//! Highlight harvesting.
//!
//! One pass per category over the selected region. Each pass has a fixed
//! importance tier and an accepted length band in characters.

use std::collections::HashSet;

use crate::config::ExtractConfig;
use crate::markup::{attr, text_of, TagIndex};
use crate::types::{Highlight, HighlightCategory, Importance};

struct Pass {
    category: HighlightCategory,
    importance: Importance,
    min_chars: usize,
    max_chars: usize,
    matches: fn(&str, &str) -> bool,
}

const PASSES: &[Pass] = &[
    Pass {
        category: HighlightCategory::Emphasis,
        importance: Importance::High,
        min_chars: 10,
        max_chars: 500,
        matches: |name, _| matches!(name, "strong" | "b" | "em" | "i"),
    },
    Pass {
        category: HighlightCategory::Mark,
        importance: Importance::Medium,
        min_chars: 5,
        max_chars: 300,
        matches: |name, attrs| name == "mark" || has_highlight_class(attrs),
    },
    Pass {
        category: HighlightCategory::Quote,
        importance: Importance::Medium,
        min_chars: 20,
        max_chars: 800,
        matches: |name, _| name == "blockquote",
    },
    Pass {
        category: HighlightCategory::Heading,
        importance: Importance::Medium,
        min_chars: 5,
        max_chars: 200,
        matches: |name, _| matches!(name, "h2" | "h3" | "h4" | "h5" | "h6"),
    },
    Pass {
        category: HighlightCategory::ListItem,
        importance: Importance::Low,
        min_chars: 10,
        max_chars: 300,
        matches: |name, _| name == "li",
    },
];

fn has_highlight_class(attrs: &str) -> bool {
    attr(attrs, "class")
        .is_some_and(|class| class.to_ascii_lowercase().contains("highlight"))
}

/// Harvest highlights from a region's markup.
pub fn harvest(region_html: &str, cfg: &ExtractConfig) -> Vec<Highlight> {
    let tags = TagIndex::new(region_html);
    let list_items = tags.by_name("li").len();

    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<Highlight> = Vec::new();

    'passes: for pass in PASSES {
        if pass.category == HighlightCategory::ListItem && list_items > cfg.max_list_items {
            // Long lists are menus.
            continue;
        }
        for el in tags.elements(pass.matches) {
            if out.len() >= cfg.max_highlights {
                break 'passes;
            }
            if el.text_weight > pass.max_chars {
                // Cannot fit; skip decoding a large container.
                continue;
            }
            let text = text_of(el.inner);
            let len = text.chars().count();
            if len < pass.min_chars || len > pass.max_chars {
                continue;
            }
            if seen.insert(text.clone()) {
                out.push(Highlight {
                    text,
                    importance: pass.importance,
                    category: pass.category,
                });
            }
        }
    }

    out
}
