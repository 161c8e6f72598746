//! YAML configuration for the pagesift pipeline.
//!
//! One file carries every stage's settings. Sections that are left out fall
//! back to their defaults, so the smallest valid file is `version: "1"`.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "news crawler"
//!
//! extract:
//!   max_title_chars: 200
//!   min_content_chars: 50
//!   max_highlights: 20
//!
//! similarity:
//!   algorithm: "cosine"
//!   threshold: 0.8
//!   fingerprint_algorithm: "simhash"
//!   use_parallel: false
//!
//! fingerprint:
//!   minhash_bands: 128
//!   digest_hex_len: 32
//!   shingle_width: 3
//!
//! store:
//!   key_prefix: "pagesift"
//!   ttl_secs: 86400
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use extract::ExtractConfig;
use serde::{Deserialize, Serialize};
use similarity::{Algorithm, ClusterConfig, FingerprintAlgorithm, FingerprintConfig, KeywordConfig};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default)]
    pub similarity: SimilaritySection,

    #[serde(default)]
    pub fingerprint: FingerprintConfig,

    #[serde(default)]
    pub store: StoreSection,
}

impl PipelineConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        if self.extract.max_title_chars == 0 {
            return Err(ConfigLoadError::Validation(
                "extract.max_title_chars must be >= 1".to_string(),
            ));
        }
        self.similarity.validate()?;
        self.fingerprint
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("fingerprint: {err}")))?;
        self.store.validate()?;
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            extract: ExtractConfig::default(),
            similarity: SimilaritySection::default(),
            fingerprint: FingerprintConfig::default(),
            store: StoreSection::default(),
        }
    }
}

/// Scoring and clustering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilaritySection {
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,

    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Family used for the novelty key.
    #[serde(default = "default_fingerprint_algorithm")]
    pub fingerprint_algorithm: FingerprintAlgorithm,

    #[serde(default)]
    pub use_parallel: bool,

    #[serde(default)]
    pub keywords: KeywordConfig,
}

impl SimilaritySection {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigLoadError::Validation(format!(
                "similarity.threshold must be within [0, 1] (got {})",
                self.threshold
            )));
        }
        self.keywords
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("similarity.keywords: {err}")))
    }

    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig::default()
            .with_parallel(self.use_parallel)
            .with_keywords(self.keywords.clone())
    }
}

impl Default for SimilaritySection {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            threshold: default_threshold(),
            fingerprint_algorithm: default_fingerprint_algorithm(),
            use_parallel: false,
            keywords: KeywordConfig::default(),
        }
    }
}

/// Novelty-store keying and retention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// `null` keeps entries forever.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: Option<u64>,
}

impl StoreSection {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.key_prefix.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "store.key_prefix must not be empty".to_string(),
            ));
        }
        if self.ttl_secs == Some(0) {
            return Err(ConfigLoadError::Validation(
                "store.ttl_secs must be >= 1 or null".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_algorithm() -> Algorithm {
    Algorithm::Cosine
}
fn default_threshold() -> f64 {
    0.8
}
fn default_fingerprint_algorithm() -> FingerprintAlgorithm {
    FingerprintAlgorithm::Simhash
}
fn default_key_prefix() -> String {
    "pagesift".to_string()
}
fn default_ttl_secs() -> Option<u64> {
    Some(86_400)
}
