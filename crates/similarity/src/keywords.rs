//! Frequency-ranked keyword sets for the keyword-overlap metric.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use stop_words::{get, LANGUAGE};

use crate::config::KeywordConfig;

static STOP_WORDS: Lazy<HashSet<String>> =
    Lazy::new(|| get(LANGUAGE::English).into_iter().collect());

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Top keywords of an already preprocessed text.
///
/// Ranked by frequency; ties keep first-occurrence order.
pub fn top_keywords(processed: &str, cfg: &KeywordConfig) -> Vec<String> {
    // token -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, token) in processed.split_whitespace().enumerate() {
        if token.chars().count() < cfg.min_token_chars || is_stop_word(token) {
            continue;
        }
        counts.entry(token).or_insert((0, pos)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> =
        counts.into_iter().map(|(t, (n, first))| (t, n, first)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(cfg.top_n)
        .map(|(t, _, _)| t.to_string())
        .collect()
}
