//! # pagesift Similarity Engine
//!
//! Plain-text comparison for the pagesift pipeline. Markup never reaches this
//! crate; it scores, fingerprints and groups whatever text the extractor
//! produced.
//!
//! ## What we do
//!
//! - **Score** two texts with one of four metrics: term-frequency cosine,
//!   token-set Jaccard, normalized Levenshtein, and a keyword-overlap proxy
//!   ([`Algorithm::Fingerprint`], also accepted as `"semantic"`). The proxy is
//!   frequency-ranked keywords, not embeddings.
//! - **Fingerprint** content as simhash, MinHash or minimum character
//!   shingle, each a fixed-width hex digest.
//! - **Cluster** documents into near-duplicate groups with a greedy,
//!   order-dependent pass, optionally spreading each row of comparisons over
//!   rayon.
//! - **Rank** a batch of candidates against one base text.
//!
//! Every operation is a pure function of its inputs. The only failures are
//! unknown algorithm names, out-of-range thresholds and invalid configs.
//!
//! ## Example
//!
//! ```
//! use similarity::{score, Algorithm};
//!
//! let a = "The quick brown fox";
//! let b = "The quick brown fox.";
//! assert_eq!(score(a, b, Algorithm::Cosine).value, 1.0);
//! assert!(score(a, b, Algorithm::Levenshtein).value < 1.0);
//! ```

use tracing::debug;

mod algorithm;
mod cluster;
mod config;
mod error;
mod fingerprint;
mod keywords;
mod metrics;
mod minhash;

pub use crate::algorithm::{Algorithm, FingerprintAlgorithm};
pub use crate::cluster::{
    cluster_duplicates, rank_against, ClusterReport, DuplicateGroup, RankedMatch, TextDocument,
};
pub use crate::config::{ClusterConfig, FingerprintConfig, KeywordConfig};
pub use crate::error::SimilarityError;
pub use crate::fingerprint::{
    estimate_jaccard, fingerprint, fingerprint_named, hamming_distance, minhash_signature,
    Fingerprint,
};
pub use crate::keywords::top_keywords;
pub use crate::metrics::{levenshtein_distance, ScoreDetails, SimilarityScore};

use crate::metrics::{score_prepared, PreparedText};

/// Compare two texts with default keyword settings.
pub fn score(text1: &str, text2: &str, algorithm: Algorithm) -> SimilarityScore {
    score_with_keywords(text1, text2, algorithm, &KeywordConfig::default())
}

/// Compare two texts; `keywords` only affects [`Algorithm::Fingerprint`].
pub fn score_with_keywords(
    text1: &str,
    text2: &str,
    algorithm: Algorithm,
    keywords: &KeywordConfig,
) -> SimilarityScore {
    let a = PreparedText::new(text1, algorithm, keywords);
    let b = PreparedText::new(text2, algorithm, keywords);
    let result = score_prepared(&a, &b, algorithm);
    debug!(algorithm = %algorithm, value = result.value, "similarity_scored");
    result
}

/// [`score`] with the algorithm given by name.
pub fn score_named(text1: &str, text2: &str, algorithm: &str) -> Result<SimilarityScore, SimilarityError> {
    Ok(score(text1, text2, algorithm.parse()?))
}
