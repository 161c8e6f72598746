//! Extraction tuning knobs.
//!
//! The defaults are the thresholds the extractor was designed around; they
//! are exposed so the surrounding application can load them from its
//! configuration file.

use serde::{Deserialize, Serialize};

use crate::{EXTRACTION_FAILED_PLACEHOLDER, UNKNOWN_TITLE};

/// Configuration for [`extract_with_config`](crate::extract_with_config).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractConfig {
    /// Longest acceptable title, in characters.
    pub max_title_chars: usize,
    /// Structured text shorter than this triggers the paragraph and
    /// plain-text fallbacks.
    pub min_content_chars: usize,
    /// Final text shorter than this is replaced by the placeholder.
    pub min_final_chars: usize,
    /// Cap on the highlight list.
    pub max_highlights: usize,
    /// List items are only harvested when the region holds at most this many.
    pub max_list_items: usize,
    /// Title used when no strategy produces an acceptable candidate.
    pub unknown_title: String,
    /// Content used when every text strategy fails.
    pub placeholder: String,
}

impl ExtractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_title_chars(mut self, chars: usize) -> Self {
        self.max_title_chars = chars;
        self
    }

    pub fn with_min_content_chars(mut self, chars: usize) -> Self {
        self.min_content_chars = chars;
        self
    }

    pub fn with_max_highlights(mut self, max: usize) -> Self {
        self.max_highlights = max;
        self
    }

    pub fn with_max_list_items(mut self, max: usize) -> Self {
        self.max_list_items = max;
        self
    }

    /// The configured sentinel title, never empty.
    pub fn unknown_title(&self) -> &str {
        non_blank_or(&self.unknown_title, UNKNOWN_TITLE)
    }

    /// The configured placeholder content, never empty.
    pub fn placeholder(&self) -> &str {
        non_blank_or(&self.placeholder, EXTRACTION_FAILED_PLACEHOLDER)
    }
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_title_chars: 200,
            min_content_chars: 50,
            min_final_chars: 10,
            max_highlights: 20,
            max_list_items: 10,
            unknown_title: UNKNOWN_TITLE.to_string(),
            placeholder: EXTRACTION_FAILED_PLACEHOLDER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_sentinels_fall_back_to_builtins() {
        let cfg = ExtractConfig {
            unknown_title: "  ".into(),
            placeholder: String::new(),
            ..Default::default()
        };
        assert_eq!(cfg.unknown_title(), UNKNOWN_TITLE);
        assert_eq!(cfg.placeholder(), EXTRACTION_FAILED_PLACEHOLDER);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: ExtractConfig =
            serde_json::from_str(r#"{"max_highlights": 5}"#).expect("valid config json");
        assert_eq!(cfg.max_highlights, 5);
        assert_eq!(cfg.max_title_chars, 200);
    }
}
