use thiserror::Error;

/// Errors returned by the similarity engine.
///
/// Scoring itself never fails; only caller-supplied selectors, thresholds
/// and configuration are checked.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimilarityError {
    #[error("unknown similarity algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("unknown fingerprint algorithm '{0}'")]
    UnknownFingerprintAlgorithm(String),

    #[error("threshold must be within [0, 1] (got {0})")]
    InvalidThreshold(f64),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Reject NaN and anything outside `[0, 1]`.
pub(crate) fn check_threshold(threshold: f64) -> Result<(), SimilarityError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(SimilarityError::InvalidThreshold(threshold))
    }
}
