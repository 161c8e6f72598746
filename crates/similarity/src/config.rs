//! Configuration for fingerprinting, keyword extraction and clustering.
//!
//! Everything here is plain data: no I/O and no environment lookups, so the
//! engine stays a pure function of `(text, config)`.

use serde::{Deserialize, Serialize};

use crate::error::SimilarityError;

/// Fingerprint generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Number of seeded hash functions in a MinHash signature.
    pub minhash_bands: usize,
    /// Length of the hex MinHash digest. Each band contributes 8 hex chars
    /// before truncation.
    pub digest_hex_len: usize,
    /// Character shingle width for the shingle fingerprint.
    pub shingle_width: usize,
    /// Seed for every hash function.
    ///
    /// Two fingerprints are only comparable when produced with the same seed.
    pub seed: u64,
}

impl FingerprintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minhash_bands(mut self, bands: usize) -> Self {
        self.minhash_bands = bands;
        self
    }

    pub fn with_digest_hex_len(mut self, len: usize) -> Self {
        self.digest_hex_len = len;
        self
    }

    pub fn with_shingle_width(mut self, width: usize) -> Self {
        self.shingle_width = width;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), SimilarityError> {
        if self.minhash_bands < 1 {
            return Err(SimilarityError::InvalidConfig(format!(
                "minhash_bands must be >= 1 (got {})",
                self.minhash_bands
            )));
        }
        if self.digest_hex_len < 1 {
            return Err(SimilarityError::InvalidConfig(format!(
                "digest_hex_len must be >= 1 (got {})",
                self.digest_hex_len
            )));
        }
        if self.shingle_width < 1 {
            return Err(SimilarityError::InvalidConfig(format!(
                "shingle_width must be >= 1 (got {})",
                self.shingle_width
            )));
        }
        Ok(())
    }
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            minhash_bands: 128,
            digest_hex_len: 32,
            shingle_width: 3,
            seed: 0x5EED_CAFE_F00D_D00D,
        }
    }
}

/// Keyword extraction for the fingerprint (keyword-overlap) metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeywordConfig {
    /// Keywords kept per text, most frequent first.
    pub top_n: usize,
    /// Shorter tokens are never keywords.
    pub min_token_chars: usize,
}

impl KeywordConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_min_token_chars(mut self, chars: usize) -> Self {
        self.min_token_chars = chars;
        self
    }

    pub fn validate(&self) -> Result<(), SimilarityError> {
        if self.top_n < 1 {
            return Err(SimilarityError::InvalidConfig(format!(
                "top_n must be >= 1 (got {})",
                self.top_n
            )));
        }
        Ok(())
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            min_token_chars: 3,
        }
    }
}

/// Duplicate clustering options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClusterConfig {
    /// Score each row of comparisons on the rayon pool. Output is identical
    /// to the sequential run.
    pub use_parallel: bool,
    pub keywords: KeywordConfig,
}

impl ClusterConfig {
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    pub fn with_keywords(mut self, keywords: KeywordConfig) -> Self {
        self.keywords = keywords;
        self
    }
}
