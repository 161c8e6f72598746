//! Configuration for the preprocessing pass.
//!
//! [`PreprocessConfig`] controls how raw text is turned into the comparable
//! form every bag-of-words similarity algorithm works on. The defaults match
//! what the similarity engine expects: NFKC, lowercase, punctuation removed.
//!
//! # Examples
//!
//! ```rust
//! use canonical::PreprocessConfig;
//!
//! let config = PreprocessConfig::default();
//! assert!(config.normalize_unicode);
//! assert!(config.lowercase);
//! assert!(config.strip_punctuation);
//!
//! // Keep punctuation attached to tokens.
//! let raw = PreprocessConfig::default().with_strip_punctuation(false);
//! assert!(!raw.strip_punctuation);
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for [`preprocess`](crate::preprocess).
///
/// Cheap to clone and serde-friendly so it can be embedded in the pipeline
/// YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Apply Unicode NFKC normalization before any other transform.
    ///
    /// Composed and decomposed forms ("é" vs "e" + U+0301) and full-width
    /// Latin letters then compare equal.
    pub normalize_unicode: bool,

    /// Apply locale-free Unicode lowercasing.
    pub lowercase: bool,

    /// Treat every character that is not a word character as a delimiter.
    ///
    /// Word characters are Unicode letters and digits (Latin, CJK and every
    /// other script), combining marks, and `_`. Everything else, including
    /// punctuation and symbols, separates tokens.
    ///
    /// ```text
    /// "The quick brown fox." → "the quick brown fox"
    /// "数据-处理, done!"      → "数据 处理 done"
    /// ```
    pub strip_punctuation: bool,
}

impl PreprocessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    pub fn with_lowercase(mut self, enabled: bool) -> Self {
        self.lowercase = enabled;
        self
    }

    pub fn with_strip_punctuation(mut self, enabled: bool) -> Self {
        self.strip_punctuation = enabled;
        self
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            lowercase: true,
            strip_punctuation: true,
        }
    }
}
