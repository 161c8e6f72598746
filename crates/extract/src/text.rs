//! Region text normalization.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::ExtractConfig;
use crate::entities::decode_entities;
use crate::markup::{attr, remove_ranges, strip_tags, text_of, TagIndex};

static BLOCK_BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)</?(?:div|p|h[1-6]|li|article|section|ul|ol|blockquote|tr|table)\b[^<>]*>|<br\b[^<>]*>",
    )
    .expect("block boundary pattern compiles")
});

const BOILERPLATE_TAGS: &[&str] = &["nav", "aside", "header", "footer"];

type TextStrategy = fn(&str) -> String;

/// Tried in order until one yields at least `min_content_chars`.
const STRATEGIES: &[(&str, TextStrategy)] = &[
    ("structured", structured_text),
    ("paragraphs", paragraph_text),
    ("plain", plain_text),
];

/// Flatten a content region into paragraph-per-line text.
///
/// Never returns an empty string: the configured placeholder stands in when
/// every strategy comes up short.
pub fn normalize_content(region_html: &str, cfg: &ExtractConfig) -> String {
    let mut text = String::new();
    for (name, strategy) in STRATEGIES {
        text = strategy(region_html);
        let len = text.chars().count();
        if len >= cfg.min_content_chars {
            debug!(strategy = name, len, "content_strategy_accepted");
            return text;
        }
        debug!(strategy = name, len, "content_strategy_short");
    }

    if text.chars().count() < cfg.min_final_chars {
        warn!(len = text.chars().count(), "content_placeholder_used");
        return cfg.placeholder().to_string();
    }
    text
}

fn is_noise_class(attrs: &str) -> bool {
    let Some(class) = attr(attrs, "class") else {
        return false;
    };
    class.split_whitespace().any(|token| {
        let token = token.to_ascii_lowercase();
        token == "ad"
            || token == "ads"
            || token.starts_with("ad-")
            || token.starts_with("ad_")
            || token.contains("advert")
            || token.contains("banner")
            || token.contains("sidebar")
    })
}

/// Region markup with navigation, chrome and ad containers cut out.
fn without_boilerplate(region_html: &str) -> String {
    let tags = TagIndex::new(region_html);
    let ranges: Vec<_> = tags
        .elements(|name, attrs| BOILERPLATE_TAGS.contains(&name) || is_noise_class(attrs))
        .into_iter()
        .map(|el| el.outer)
        .collect();
    remove_ranges(region_html, &ranges)
}

pub(crate) fn structured_text(region_html: &str) -> String {
    // Source line breaks carry no meaning; only block boundaries do.
    let flat = canonical::collapse_whitespace(&without_boilerplate(region_html));
    let broken = BLOCK_BOUNDARY_RE.replace_all(&flat, "\n");
    let stripped = strip_tags(&broken);
    canonical::collapse_lines(&decode_entities(&stripped))
}

pub(crate) fn paragraph_text(region_html: &str) -> String {
    let cleaned = without_boilerplate(region_html);
    TagIndex::new(&cleaned)
        .by_name("p")
        .iter()
        .map(|el| text_of(el.inner))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn plain_text(region_html: &str) -> String {
    text_of(region_html)
}
