//! Pairwise similarity metrics.
//!
//! Bag-of-words metrics (cosine, Jaccard, keyword overlap) run over
//! [`canonical::preprocess`] output. Levenshtein runs over the raw text so
//! punctuation and case still count as edits.

use std::collections::{HashMap, HashSet};

use canonical::PreprocessConfig;
use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::config::KeywordConfig;
use crate::keywords::top_keywords;

/// Result of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    /// In `[0, 1]`, rounded to 4 decimal places.
    pub value: f64,
    pub algorithm: Algorithm,
    pub details: ScoreDetails,
}

/// Diagnostics attached to a score. Not part of the similarity contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDetails {
    /// Shared distinct tokens (keywords for the fingerprint metric).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_words: Option<usize>,
    /// Distinct tokens across both texts (keywords for the fingerprint metric).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_words: Option<usize>,
    /// Character counts of the raw inputs.
    pub text_length1: usize,
    pub text_length2: usize,
}

/// A text made ready for repeated comparison.
///
/// Clustering compares each document against many others; preparing once
/// keeps preprocessing out of the O(n²) loop.
#[derive(Debug, Clone)]
pub struct PreparedText<'a> {
    raw: &'a str,
    raw_chars: usize,
    processed: String,
    keywords: Vec<String>,
}

impl<'a> PreparedText<'a> {
    pub fn new(raw: &'a str, algorithm: Algorithm, keywords: &KeywordConfig) -> Self {
        let processed = match algorithm {
            Algorithm::Levenshtein => String::new(),
            _ => canonical::preprocess(raw, &PreprocessConfig::default()),
        };
        let keywords = match algorithm {
            Algorithm::Fingerprint => top_keywords(&processed, keywords),
            _ => Vec::new(),
        };
        Self {
            raw,
            raw_chars: raw.chars().count(),
            processed,
            keywords,
        }
    }

    fn tokens(&self) -> impl Iterator<Item = &str> {
        self.processed.split_whitespace()
    }
}

/// Score two prepared texts. Both must have been prepared for `algorithm`.
pub fn score_prepared(a: &PreparedText<'_>, b: &PreparedText<'_>, algorithm: Algorithm) -> SimilarityScore {
    let mut details = ScoreDetails {
        text_length1: a.raw_chars,
        text_length2: b.raw_chars,
        ..Default::default()
    };

    let value = match algorithm {
        Algorithm::Cosine => {
            let (common, total) = set_overlap(a.tokens(), b.tokens());
            details.common_words = Some(common);
            details.total_words = Some(total);
            cosine(a, b)
        }
        Algorithm::Jaccard => {
            let (common, total) = set_overlap(a.tokens(), b.tokens());
            details.common_words = Some(common);
            details.total_words = Some(total);
            ratio(common, total)
        }
        Algorithm::Levenshtein => levenshtein_similarity(a.raw, b.raw),
        Algorithm::Fingerprint => {
            let (common, total) = set_overlap(
                a.keywords.iter().map(String::as_str),
                b.keywords.iter().map(String::as_str),
            );
            details.common_words = Some(common);
            details.total_words = Some(total);
            ratio(common, total)
        }
    };

    SimilarityScore {
        value: round4(value),
        algorithm,
        details,
    }
}

/// Clamp to `[0, 1]` and round to 4 decimal places.
pub fn round4(value: f64) -> f64 {
    (value.clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0
}

fn ratio(common: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        common as f64 / total as f64
    }
}

/// `(|A ∩ B|, |A ∪ B|)` over distinct items.
fn set_overlap<'t>(
    a: impl Iterator<Item = &'t str>,
    b: impl Iterator<Item = &'t str>,
) -> (usize, usize) {
    let a: HashSet<&str> = a.collect();
    let b: HashSet<&str> = b.collect();
    let common = a.intersection(&b).count();
    (common, a.len() + b.len() - common)
}

fn term_frequencies<'t>(tokens: impl Iterator<Item = &'t str>) -> HashMap<&'t str, u64> {
    let mut tf = HashMap::new();
    for token in tokens {
        *tf.entry(token).or_insert(0u64) += 1;
    }
    tf
}

/// Integer dot product and squared norms, so hash-map iteration order
/// cannot change the result.
fn cosine(a: &PreparedText<'_>, b: &PreparedText<'_>) -> f64 {
    let tf_a = term_frequencies(a.tokens());
    let tf_b = term_frequencies(b.tokens());

    let dot: u64 = tf_a
        .iter()
        .filter_map(|(term, x)| tf_b.get(term).map(|y| x * y))
        .sum();
    let norm_a: u64 = tf_a.values().map(|x| x * x).sum();
    let norm_b: u64 = tf_b.values().map(|y| y * y).sum();

    if norm_a == 0 || norm_b == 0 {
        return 0.0;
    }
    dot as f64 / ((norm_a as f64).sqrt() * (norm_b as f64).sqrt())
}

/// Edit distance over Unicode scalar values with unit costs.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / longest as f64
}
