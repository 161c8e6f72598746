//! HTML character reference decoding.
//!
//! Covers the references real pages actually use: the XML five, `&nbsp;`,
//! common typographic names, and every decimal or hex numeric reference.
//! Unknown names and out-of-range code points are left exactly as written.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("entity pattern compiles")
});

/// Decode character references in `text`.
///
/// ```rust
/// use extract::decode_entities;
///
/// assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
/// assert_eq!(decode_entities("&#169; 2024 &#x263A;"), "© 2024 ☺");
/// assert_eq!(decode_entities("&bogus; stays"), "&bogus; stays");
/// ```
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    ENTITY_RE.replace_all(text, |caps: &Captures| {
        let body = &caps[1];
        match decode_reference(body) {
            Some(ch) => ch.to_string(),
            None => caps[0].to_string(),
        }
    })
}

fn decode_reference(body: &str) -> Option<char> {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(|c| c == 'x' || c == 'X') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        if code == 0 {
            return None;
        }
        return char::from_u32(code);
    }
    named_reference(body)
}

fn named_reference(name: &str) -> Option<char> {
    let ch = match name {
        "amp" | "AMP" => '&',
        "lt" | "LT" => '<',
        "gt" | "GT" => '>',
        "quot" | "QUOT" => '"',
        "apos" => '\'',
        // Decoded to a plain space so whitespace collapsing treats it uniformly.
        "nbsp" => ' ',
        "ensp" | "emsp" | "thinsp" => ' ',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "hellip" => '\u{2026}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "sbquo" => '\u{201A}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "bdquo" => '\u{201E}',
        "laquo" => '\u{00AB}',
        "raquo" => '\u{00BB}',
        "bull" => '\u{2022}',
        "middot" => '\u{00B7}',
        "copy" => '\u{00A9}',
        "reg" => '\u{00AE}',
        "trade" => '\u{2122}',
        "deg" => '\u{00B0}',
        "times" => '\u{00D7}',
        "divide" => '\u{00F7}',
        "euro" => '\u{20AC}',
        "pound" => '\u{00A3}',
        "yen" => '\u{00A5}',
        "cent" => '\u{00A2}',
        "sect" => '\u{00A7}',
        "para" => '\u{00B6}',
        "shy" => '\u{00AD}',
        "zwj" => '\u{200D}',
        "zwnj" => '\u{200C}',
        _ => return None,
    };
    Some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_required_set() {
        let input = "&amp; &lt; &gt; &quot; &#39; &apos; a&nbsp;b";
        assert_eq!(decode_entities(input), "& < > \" ' ' a b");
    }

    #[test]
    fn numeric_references() {
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("&#20013;&#25991;"), "中文");
    }

    #[test]
    fn invalid_numeric_references_pass_through() {
        assert_eq!(decode_entities("&#0;"), "&#0;");
        assert_eq!(decode_entities("&#xD800;"), "&#xD800;");
        assert_eq!(decode_entities("&#99999999;"), "&#99999999;");
    }

    #[test]
    fn no_double_decoding() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn unterminated_reference_untouched() {
        assert_eq!(decode_entities("AT&T and &amp"), "AT&T and &amp");
    }

    #[test]
    fn borrowed_when_nothing_to_do() {
        assert!(matches!(decode_entities("plain text"), Cow::Borrowed(_)));
    }
}
