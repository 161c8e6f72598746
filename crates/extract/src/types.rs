use std::fmt;

use serde::{Deserialize, Serialize};

/// Output of one extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Source address, echoed from the input.
    pub url: String,
    /// Never empty; the unknown-title sentinel when nothing qualified.
    pub title: String,
    /// Tag-free, entity-decoded text with one paragraph per line. Never
    /// empty; the placeholder when every strategy failed.
    pub content: String,
    /// Deduplicated by text, discovery order, capped.
    pub highlights: Vec<Highlight>,
    /// Whitespace-token count of `content`.
    pub word_count: usize,
    /// Which region selector produced `content`. Diagnostic only.
    pub region: RegionSource,
}

/// A short salient fragment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Highlight {
    pub text: String,
    pub importance: Importance,
    pub category: HighlightCategory,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// Structural cue a highlight was found through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightCategory {
    /// `strong`, `b`, `em`, `i`.
    Emphasis,
    /// `mark` or a class containing "highlight".
    Mark,
    /// `blockquote`.
    Quote,
    /// `h2` through `h6`.
    Heading,
    /// `li`.
    ListItem,
}

impl HighlightCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            HighlightCategory::Emphasis => "emphasis",
            HighlightCategory::Mark => "mark",
            HighlightCategory::Quote => "quote",
            HighlightCategory::Heading => "heading",
            HighlightCategory::ListItem => "list-item",
        }
    }
}

impl fmt::Display for HighlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the content region came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionSource {
    /// A semantic element such as `<article>`.
    SemanticTag { tag: String },
    /// A container whose class or id carries a content token.
    ContainerToken { token: String },
    /// The `<body>` element.
    Body,
    /// The whole cleaned document.
    Document,
}

impl fmt::Display for RegionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionSource::SemanticTag { tag } => write!(f, "<{tag}>"),
            RegionSource::ContainerToken { token } => write!(f, "[class/id*={token}]"),
            RegionSource::Body => f.write_str("<body>"),
            RegionSource::Document => f.write_str("document"),
        }
    }
}
