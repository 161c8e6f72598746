//! Content fingerprints.
//!
//! All three families work on [`canonical::preprocess`] output and hash with
//! seeded xxh3, so a fingerprint is a pure function of `(content, config)`.
//! Empty content maps to an all-`f` digest in every family.

use std::iter;

use canonical::PreprocessConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::algorithm::FingerprintAlgorithm;
use crate::config::FingerprintConfig;
use crate::error::SimilarityError;
use crate::minhash::minhash_slots;

/// A fixed-width lowercase hex digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    pub value: String,
    pub algorithm: FingerprintAlgorithm,
    /// Character count of the content the digest was computed from.
    pub content_length: usize,
}

impl Fingerprint {
    /// The digest as a 64-bit integer. Only simhash and shingle digests fit.
    pub fn as_u64(&self) -> Option<u64> {
        match self.algorithm {
            FingerprintAlgorithm::Simhash | FingerprintAlgorithm::Shingle => {
                u64::from_str_radix(&self.value, 16).ok()
            }
            FingerprintAlgorithm::Minhash => None,
        }
    }
}

/// Fingerprint `content` with the given family.
pub fn fingerprint(
    content: &str,
    algorithm: FingerprintAlgorithm,
    cfg: &FingerprintConfig,
) -> Result<Fingerprint, SimilarityError> {
    cfg.validate()?;
    let processed = canonical::preprocess(content, &PreprocessConfig::default());

    let value = match algorithm {
        FingerprintAlgorithm::Simhash => format!("{:016x}", simhash(&processed, cfg.seed)),
        FingerprintAlgorithm::Minhash => {
            let slots = signature_of(&processed, cfg);
            minhash_digest(&slots, cfg.digest_hex_len)
        }
        FingerprintAlgorithm::Shingle => {
            format!("{:016x}", min_shingle(&processed, cfg.shingle_width, cfg.seed))
        }
    };

    let content_length = content.chars().count();
    debug!(algorithm = %algorithm, content_length, fingerprint = %value, "fingerprint_generated");
    Ok(Fingerprint {
        value,
        algorithm,
        content_length,
    })
}

/// [`fingerprint`] with the family given by name.
pub fn fingerprint_named(
    content: &str,
    algorithm: &str,
    cfg: &FingerprintConfig,
) -> Result<Fingerprint, SimilarityError> {
    fingerprint(content, algorithm.parse()?, cfg)
}

/// Full MinHash signature of `content`, one `u64` per band.
pub fn minhash_signature(content: &str, cfg: &FingerprintConfig) -> Result<Vec<u64>, SimilarityError> {
    cfg.validate()?;
    let processed = canonical::preprocess(content, &PreprocessConfig::default());
    Ok(signature_of(&processed, cfg))
}

/// Fraction of agreeing slots between two signatures.
///
/// A signature of empty content shares nothing, so it scores 0 against
/// anything.
pub fn estimate_jaccard(a: &[u64], b: &[u64]) -> Result<f64, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::InvalidConfig(format!(
            "signature lengths differ ({} vs {})",
            a.len(),
            b.len()
        )));
    }
    let is_empty = |sig: &[u64]| sig.iter().all(|&v| v == u64::MAX);
    if a.is_empty() || is_empty(a) || is_empty(b) {
        return Ok(0.0);
    }
    let agreeing = a.iter().zip(b).filter(|(x, y)| x == y).count();
    Ok(agreeing as f64 / a.len() as f64)
}

/// Number of differing bits between two 64-bit digests.
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

fn token_hash(token: &str, seed: u64) -> u64 {
    xxh3_64_with_seed(token.as_bytes(), seed)
}

pub(crate) fn simhash(processed: &str, seed: u64) -> u64 {
    let mut weights = [0i64; 64];
    for token in processed.split_whitespace() {
        let h = token_hash(token, seed);
        for (bit, weight) in weights.iter_mut().enumerate() {
            if (h >> bit) & 1 == 1 {
                *weight += 1;
            } else {
                *weight -= 1;
            }
        }
    }
    let mut out = 0u64;
    for (bit, &weight) in weights.iter().enumerate() {
        if weight >= 0 {
            out |= 1u64 << bit;
        }
    }
    out
}

fn signature_of(processed: &str, cfg: &FingerprintConfig) -> Vec<u64> {
    let mut unique: Vec<u64> = processed
        .split_whitespace()
        .map(|t| token_hash(t, cfg.seed))
        .collect();
    unique.sort_unstable();
    unique.dedup();
    minhash_slots(&unique, cfg.minhash_bands, cfg.seed, false)
}

/// 8 hex chars (low 32 bits) per slot, truncated to `hex_len`.
fn minhash_digest(slots: &[u64], hex_len: usize) -> String {
    let mut digest: String = slots.iter().map(|&s| format!("{:08x}", s as u32)).collect();
    digest.truncate(hex_len);
    digest
}

pub(crate) fn min_shingle(processed: &str, width: usize, seed: u64) -> u64 {
    if processed.is_empty() {
        return u64::MAX;
    }
    let bounds: Vec<usize> = processed
        .char_indices()
        .map(|(i, _)| i)
        .chain(iter::once(processed.len()))
        .collect();
    let chars = bounds.len() - 1;
    if chars < width {
        return token_hash(processed, seed);
    }
    (0..=chars - width)
        .map(|i| token_hash(&processed[bounds[i]..bounds[i + width]], seed))
        .min()
        .unwrap_or(u64::MAX)
}
