use std::borrow::Cow;

use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::PreprocessConfig;

/// Main entry point. Turns raw text into its comparable form.
///
/// The output has single ASCII spaces between tokens and no leading or
/// trailing whitespace. Empty or delimiter-only input yields an empty string;
/// callers decide what an empty comparison means.
pub fn preprocess(input: &str, cfg: &PreprocessConfig) -> String {
    // Normalization first: it can change character boundaries.
    let normalized: Cow<str> = if cfg.normalize_unicode {
        Cow::Owned(input.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(input)
    };

    let mut out = String::with_capacity(normalized.len());
    let mut pending_space = false;

    for grapheme in normalized.graphemes(true) {
        // Lowercasing can expand one char into several (e.g. "İ").
        if cfg.lowercase {
            for lower in grapheme.chars().flat_map(char::to_lowercase) {
                dispatch_char(lower, cfg, &mut out, &mut pending_space);
            }
        } else {
            for ch in grapheme.chars() {
                dispatch_char(ch, cfg, &mut out, &mut pending_space);
            }
        }
    }

    out
}

/// Returns true for characters that belong inside a token.
#[inline]
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch.is_mark()
}

fn dispatch_char(ch: char, cfg: &PreprocessConfig, out: &mut String, pending_space: &mut bool) {
    let is_delim = ch.is_whitespace() || (cfg.strip_punctuation && !is_word_char(ch));
    if is_delim {
        if !out.is_empty() {
            *pending_space = true;
        }
        return;
    }
    if *pending_space {
        out.push(' ');
        *pending_space = false;
    }
    out.push(ch);
}
