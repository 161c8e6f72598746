//! Whitespace normalization utilities.
//!
//! Two flavours are provided: [`collapse_whitespace`] folds everything,
//! newlines included, into single spaces; [`collapse_lines`] keeps line
//! structure and is what the extractor uses so paragraphs survive tag
//! stripping.
//!
//! ```rust
//! use canonical::{collapse_lines, collapse_whitespace};
//!
//! assert_eq!(collapse_whitespace("  hello \n\n  world  "), "hello world");
//! assert_eq!(collapse_lines("  hello \n\n\n  world  "), "hello\nworld");
//! ```

/// Collapses repeated whitespace, trims edges, and normalizes newlines to
/// single spaces.
///
/// All Unicode whitespace (including U+00A0) counts as a delimiter.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("hello\t\t\tworld"), "hello world");
/// assert_eq!(collapse_whitespace("hello\u{00A0}world"), "hello world");
/// assert_eq!(collapse_whitespace("   \n\t   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}

/// Collapses whitespace inside each line, drops blank lines, and joins the
/// remaining lines with a single `\n`.
pub fn collapse_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let collapsed = collapse_whitespace(line);
        if collapsed.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&collapsed);
    }
    out
}
