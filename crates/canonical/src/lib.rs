//! pagesift preprocessing layer.
//!
//! Turns raw text into the comparable form the similarity engine scores:
//! bag-of-words algorithms (cosine, Jaccard, keyword overlap) and the
//! fingerprints all run over [`preprocess`] output, so two texts that differ
//! only in case, punctuation or spacing look identical to them.
//!
//! ## What we do
//!
//! - Unicode normalization (NFKC, configurable)
//! - Locale-free lowercasing
//! - Punctuation and symbol stripping that keeps word characters of every
//!   script, CJK included
//! - Whitespace collapsing, with a line-preserving variant for extracted text
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock, no locale. Same text + same config = same output.

mod config;
mod pipeline;
mod whitespace;

pub use crate::config::PreprocessConfig;
pub use crate::pipeline::{is_word_char, preprocess};
pub use crate::whitespace::{collapse_lines, collapse_whitespace};
