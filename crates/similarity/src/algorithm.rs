//! Algorithm selectors.
//!
//! Both enums are closed: every consumer matches them exhaustively, and the
//! string forms only enter through [`FromStr`], which rejects unknown names
//! instead of falling back to a default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SimilarityError;

/// Pairwise similarity metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Term-frequency cosine over preprocessed tokens.
    Cosine,
    /// Token-set intersection over union.
    Jaccard,
    /// Normalized edit distance over raw characters.
    Levenshtein,
    /// Top keyword overlap. A cheap stand-in for embedding similarity, not
    /// a semantic model.
    #[serde(alias = "semantic")]
    Fingerprint,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Cosine,
        Algorithm::Jaccard,
        Algorithm::Levenshtein,
        Algorithm::Fingerprint,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Cosine => "cosine",
            Algorithm::Jaccard => "jaccard",
            Algorithm::Levenshtein => "levenshtein",
            Algorithm::Fingerprint => "fingerprint",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SimilarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Algorithm::Cosine),
            "jaccard" => Ok(Algorithm::Jaccard),
            "levenshtein" => Ok(Algorithm::Levenshtein),
            "fingerprint" | "semantic" => Ok(Algorithm::Fingerprint),
            _ => {
                warn!(algorithm = s, "unknown_similarity_algorithm");
                Err(SimilarityError::UnknownAlgorithm(s.to_string()))
            }
        }
    }
}

/// Content fingerprint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintAlgorithm {
    /// 64-bit locality-sensitive token hash.
    Simhash,
    /// Per-band minimum token hashes.
    Minhash,
    /// Minimum character-shingle hash.
    Shingle,
}

impl FingerprintAlgorithm {
    pub const ALL: [FingerprintAlgorithm; 3] = [
        FingerprintAlgorithm::Simhash,
        FingerprintAlgorithm::Minhash,
        FingerprintAlgorithm::Shingle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FingerprintAlgorithm::Simhash => "simhash",
            FingerprintAlgorithm::Minhash => "minhash",
            FingerprintAlgorithm::Shingle => "shingle",
        }
    }
}

impl fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FingerprintAlgorithm {
    type Err = SimilarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simhash" => Ok(FingerprintAlgorithm::Simhash),
            "minhash" => Ok(FingerprintAlgorithm::Minhash),
            "shingle" => Ok(FingerprintAlgorithm::Shingle),
            _ => {
                warn!(algorithm = s, "unknown_fingerprint_algorithm");
                Err(SimilarityError::UnknownFingerprintAlgorithm(s.to_string()))
            }
        }
    }
}
