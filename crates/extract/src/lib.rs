//! # pagesift Extractor
//!
//! Turns raw, possibly hostile HTML into a title, a readable body of text and
//! a short list of salient fragments. There is no DOM: a regex tag scanner
//! and a set of ordered fallback strategies carry the whole load, so the
//! extractor copes with unclosed tags, template soup and pages that are
//! mostly navigation.
//!
//! ## Stages
//!
//! 1. **Noise removal**: comments and `script`/`style`/`noscript`/`template`
//!    blocks are cut from the markup.
//! 2. **Title**: Open Graph, Twitter card, `<title>`, first `<h1>`, then
//!    JSON-LD `headline`/`name`. First acceptable candidate wins.
//! 3. **Region**: semantic containers first, then class/id token heuristics,
//!    then `<body>`, then the whole document.
//! 4. **Highlights**: emphasis, marks, quotes, sub-headings and short lists
//!    harvested from the region.
//! 5. **Text**: boilerplate removed, block boundaries kept as line breaks,
//!    entities decoded. Paragraph-only and plain-text fallbacks follow.
//!
//! Extraction is total. Degenerate input yields the sentinel title and the
//! placeholder content, never an error.
//!
//! ## Example
//!
//! ```
//! use extract::extract;
//!
//! let html = "<html><body><article><h1>T</h1><p>Hello world, this is a test \
//!             paragraph that is sufficiently long to pass the minimum \
//!             extraction threshold for content.</p></article></body></html>";
//! let result = extract("https://example.com/t", html);
//!
//! assert_eq!(result.title, "T");
//! assert!(result.content.contains("Hello world"));
//! ```

use std::time::Instant;

use tracing::{info, warn, Level};

mod config;
mod entities;
mod highlights;
mod markup;
mod region;
mod text;
mod title;
mod types;

pub use crate::config::ExtractConfig;
pub use crate::entities::decode_entities;
pub use crate::types::{ExtractionResult, Highlight, HighlightCategory, Importance, RegionSource};

use crate::markup::TagIndex;
use crate::title::TitleSources;

/// Title used when no strategy yields an acceptable candidate.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Content used when every text strategy fails.
pub const EXTRACTION_FAILED_PLACEHOLDER: &str =
    "Content extraction failed: no readable text was found in this document.";

/// Extract with the default thresholds.
pub fn extract(url: &str, raw_markup: &str) -> ExtractionResult {
    extract_with_config(url, raw_markup, &ExtractConfig::default())
}

/// Extract title, content and highlights from `raw_markup`.
pub fn extract_with_config(url: &str, raw_markup: &str, cfg: &ExtractConfig) -> ExtractionResult {
    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "extract.extract", url = %url);
    let _guard = span.enter();

    let cleaned = markup::strip_noise(raw_markup);
    let tags = TagIndex::new(&cleaned);

    let title = title::resolve_title(
        &TitleSources {
            raw: raw_markup,
            tags: &tags,
        },
        cfg,
    );

    let region = region::select_region(&tags);
    let highlights = highlights::harvest(region.html, cfg);
    let content = text::normalize_content(region.html, cfg);
    let word_count = content.split_whitespace().count();

    if content == cfg.placeholder() {
        warn!(
            region = %region.source,
            raw_len = raw_markup.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "extract_degraded"
        );
    } else {
        info!(
            title_len = title.chars().count(),
            content_len = content.chars().count(),
            highlights = highlights.len(),
            region = %region.source,
            elapsed_micros = start.elapsed().as_micros(),
            "extract_success"
        );
    }

    ExtractionResult {
        url: url.to_string(),
        title,
        content,
        highlights,
        word_count,
        region: region.source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ARTICLE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Fallback title</title>
  <meta property="og:title" content="Rust &amp; the Web">
  <script>document.write("<article>fake</article>")</script>
  <style>.x { color: red }</style>
</head>
<body>
  <nav><ul><li>Home</li><li>About</li></ul></nav>
  <div class="main-wrapper">
    <article>
      <h1>Rust and the Web</h1>
      <p>Rust compiles to <strong>fast native code and WebAssembly</strong>
         which makes it a strong fit for web tooling.</p>
      <h2>Why it matters</h2>
      <blockquote>Safety without a garbage collector changes the trade-offs.</blockquote>
      <p>Second paragraph with a <mark>marked phrase</mark> in it.</p>
      <div class="ad-banner">Buy things now</div>
    </article>
  </div>
  <footer>Copyright notice</footer>
</body>
</html>"#;

    #[test]
    fn spec_style_example() {
        let html = "<html><body><article><h1>T</h1><p>Hello world, this is a test paragraph that is sufficiently long to pass the minimum extraction threshold for content.</p></article></body></html>";
        let result = extract("https://example.com/", html);
        assert_eq!(result.title, "T");
        assert!(result.content.contains("Hello world"));
        assert_eq!(result.url, "https://example.com/");
        assert_eq!(result.region, RegionSource::SemanticTag { tag: "article".into() });
    }

    #[test]
    fn full_document() {
        let result = extract("https://example.com/rust", ARTICLE);
        assert_eq!(result.title, "Rust & the Web");
        assert!(result.content.starts_with("Rust and the Web\nRust compiles to"));
        assert!(!result.content.contains("Buy things"));
        assert!(!result.content.contains("fake"));
        assert!(!result.content.contains("Copyright"));
        assert_eq!(result.word_count, result.content.split_whitespace().count());

        let cats: Vec<HighlightCategory> = result.highlights.iter().map(|h| h.category).collect();
        assert_eq!(
            cats,
            vec![
                HighlightCategory::Emphasis,
                HighlightCategory::Mark,
                HighlightCategory::Quote,
                HighlightCategory::Heading,
            ]
        );
    }

    #[test]
    fn idempotent() {
        let a = extract("u", ARTICLE);
        let b = extract("u", ARTICLE);
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_inputs_degrade() {
        for input in ["", "   ", "<", "<<<>>>", "<div><div><div>", "<!-- open comment", "<script>x"] {
            let result = extract("u", input);
            assert_eq!(result.title, UNKNOWN_TITLE, "input {input:?}");
            assert_eq!(result.content, EXTRACTION_FAILED_PLACEHOLDER, "input {input:?}");
            assert_eq!(
                result.word_count,
                EXTRACTION_FAILED_PLACEHOLDER.split_whitespace().count()
            );
        }
    }

    #[test]
    fn deeply_nested_markup_terminates() {
        let depth = 2_000;
        let html = format!(
            "{}<p>deep text that is long enough to keep as real content here</p>{}",
            "<div>".repeat(depth),
            "</div>".repeat(depth / 2)
        );
        let result = extract("u", &html);
        assert!(result.content.contains("deep text"));
    }

    #[test]
    fn nested_sections_extract_in_linear_time() {
        let depth = 8_000;
        let html = format!(
            "{}<p>innermost paragraph that is long enough to keep as real content</p>{}",
            "<section>x ".repeat(depth),
            "</section>".repeat(depth)
        );
        let start = std::time::Instant::now();
        let result = extract("u", &html);
        assert!(
            start.elapsed() < std::time::Duration::from_secs(5),
            "took {:?}",
            start.elapsed()
        );
        assert_eq!(result.region, RegionSource::SemanticTag { tag: "section".into() });
        assert!(result.content.contains("innermost paragraph"));
        assert_eq!(result.content.lines().filter(|l| *l == "x").count(), depth);
    }

    #[test]
    fn unclosed_content_containers_stay_fast() {
        let depth = 8_000;
        let html = format!(
            "<body>{}<p>body text that is long enough to keep as real content here</p>",
            "<div class=\"content\">y ".repeat(depth)
        );
        let start = std::time::Instant::now();
        let result = extract("u", &html);
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
        assert_eq!(result.region, RegionSource::ContainerToken { token: "content".into() });
        assert!(result.content.contains("body text"));
    }

    #[test]
    fn highlights_unique_and_capped() {
        let mut html = String::from("<article>");
        for i in 0..30 {
            html.push_str(&format!("<p><strong>repeated emphasis text</strong> <em>unique emphasis {i}</em></p>"));
        }
        html.push_str("</article>");
        let result = extract("u", &html);
        assert!(result.highlights.len() <= 20);
        let texts: HashSet<&str> = result.highlights.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts.len(), result.highlights.len());
    }

    #[test]
    fn custom_sentinels() {
        let cfg = ExtractConfig {
            unknown_title: "untitled".into(),
            placeholder: "nothing here".into(),
            ..Default::default()
        };
        let result = extract_with_config("u", "", &cfg);
        assert_eq!(result.title, "untitled");
        assert_eq!(result.content, "nothing here");
        assert_eq!(result.word_count, 2);
    }

    #[test]
    fn result_serializes_with_labels() {
        let result = extract("u", "<article><p><b>bold fragment here</b> and more text</p></article>");
        let json = serde_json::to_value(&result).expect("serializable");
        assert_eq!(json["highlights"][0]["importance"], "high");
        assert_eq!(json["highlights"][0]["category"], "emphasis");
        assert_eq!(json["region"]["kind"], "semantic_tag");
    }
}
