//! Workspace umbrella crate for pagesift.
//!
//! Stitches the extractor and the similarity engine into one pipeline:
//! raw markup goes in, a readable [`ExtractionResult`], a content
//! [`Fingerprint`] and a novelty verdict come out. Whether a page was seen
//! before is answered by an injected [`KeyValueStore`]; the pipeline itself
//! holds no state beyond its configuration.
//!
//! ```
//! use std::sync::Arc;
//! use pagesift::{InMemoryStore, Novelty, Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::new(PipelineConfig::default())
//!     .with_store(Arc::new(InMemoryStore::new()));
//! let html = "<article><h1>Post</h1><p>A paragraph long enough to count as the \
//!             readable content of this small test page.</p></article>";
//!
//! let first = pipeline.process("https://a.example/post", html).unwrap();
//! let again = pipeline.process("https://b.example/copy", html).unwrap();
//! assert_eq!(first.novelty, Novelty::New);
//! assert_eq!(
//!     again.novelty,
//!     Novelty::Duplicate { first_seen_url: "https://a.example/post".into() }
//! );
//! ```

pub mod config;
pub mod store;

pub use canonical::{collapse_whitespace, preprocess, PreprocessConfig};
pub use extract::{
    extract, extract_with_config, ExtractConfig, ExtractionResult, Highlight, HighlightCategory,
    Importance, RegionSource, EXTRACTION_FAILED_PLACEHOLDER, UNKNOWN_TITLE,
};
pub use similarity::{
    cluster_duplicates, estimate_jaccard, fingerprint, fingerprint_named, hamming_distance,
    minhash_signature, rank_against, score, score_named, Algorithm, ClusterConfig, ClusterReport,
    DuplicateGroup, Fingerprint, FingerprintAlgorithm, FingerprintConfig, KeywordConfig,
    RankedMatch, ScoreDetails, SimilarityError, SimilarityScore, TextDocument,
};

pub use crate::config::{ConfigLoadError, PipelineConfig, SimilaritySection, StoreSection};
pub use crate::store::{InMemoryStore, KeyValueStore, StoreError};

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, Level};

/// Errors that can occur while running a document through the pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("similarity failure: {0}")]
    Similarity(#[from] SimilarityError),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

/// Whether a document's content was seen before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Novelty {
    /// The fingerprint was already recorded for another URL.
    Duplicate { first_seen_url: String },
    /// First sighting; the URL is now recorded.
    New,
    /// No store is attached, or extraction degraded to the placeholder.
    Unchecked,
}

/// Everything the pipeline learned about one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub extraction: ExtractionResult,
    pub fingerprint: Fingerprint,
    pub novelty: Novelty,
}

impl ProcessedDocument {
    pub fn to_text_document(&self) -> TextDocument {
        TextDocument::new(&self.extraction.url, &self.extraction.content)
            .with_title(&self.extraction.title)
    }
}

/// Extract → fingerprint → novelty lookup.
pub struct Pipeline {
    cfg: PipelineConfig,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl Pipeline {
    pub fn new(cfg: PipelineConfig) -> Self {
        Self { cfg, store: None }
    }

    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Store key for a fingerprint: `{prefix}:{algorithm}:{digest}`.
    pub fn novelty_key(&self, fp: &Fingerprint) -> String {
        format!("{}:{}:{}", self.cfg.store.key_prefix, fp.algorithm, fp.value)
    }

    /// Run one document through the pipeline.
    ///
    /// The novelty check goes through [`KeyValueStore::put_if_absent`], so
    /// concurrent sightings of the same content report `New` once when the
    /// store implements it atomically.
    pub fn process(&self, url: &str, raw_markup: &str) -> Result<ProcessedDocument, PipelineError> {
        let start = Instant::now();
        let span = tracing::span!(Level::INFO, "pipeline.process", url = %url);
        let _guard = span.enter();

        let extraction = extract_with_config(url, raw_markup, &self.cfg.extract);
        let fp = fingerprint(
            &extraction.content,
            self.cfg.similarity.fingerprint_algorithm,
            &self.cfg.fingerprint,
        )?;

        let degraded = extraction.content == self.cfg.extract.placeholder();
        let novelty = match &self.store {
            Some(store) if !degraded => {
                let key = self.novelty_key(&fp);
                match store.put_if_absent(&key, url, self.cfg.store.ttl())? {
                    Some(first_seen_url) => {
                        info!(
                            fingerprint = %fp.value,
                            first_seen_url = %first_seen_url,
                            elapsed_micros = start.elapsed().as_micros(),
                            "pipeline_duplicate"
                        );
                        Novelty::Duplicate { first_seen_url }
                    }
                    None => {
                        info!(
                            fingerprint = %fp.value,
                            elapsed_micros = start.elapsed().as_micros(),
                            "pipeline_new"
                        );
                        Novelty::New
                    }
                }
            }
            Some(_) => {
                debug!("pipeline_skip_degraded");
                Novelty::Unchecked
            }
            None => Novelty::Unchecked,
        };

        Ok(ProcessedDocument {
            extraction,
            fingerprint: fp,
            novelty,
        })
    }

    /// Drop a fingerprint from the store so the next sighting counts as new.
    pub fn forget(&self, fp: &Fingerprint) -> Result<(), PipelineError> {
        if let Some(store) = &self.store {
            store.delete(&self.novelty_key(fp))?;
        }
        Ok(())
    }

    /// Group processed documents with the configured algorithm and threshold.
    pub fn cluster(&self, docs: &[ProcessedDocument]) -> Result<ClusterReport, PipelineError> {
        let texts: Vec<TextDocument> = docs.iter().map(ProcessedDocument::to_text_document).collect();
        self.cluster_texts(&texts)
    }

    pub fn cluster_texts(&self, docs: &[TextDocument]) -> Result<ClusterReport, PipelineError> {
        let section = &self.cfg.similarity;
        Ok(cluster_duplicates(
            docs,
            section.threshold,
            section.algorithm,
            &section.cluster_config(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><head><title>Greeting</title></head><body><article><p>Hello world, \
        this paragraph is long enough to be accepted as the readable content.</p></article></body></html>";

    #[test]
    fn unchecked_without_store() {
        let pipeline = Pipeline::new(PipelineConfig::default());
        let doc = pipeline.process("u", PAGE).unwrap();
        assert_eq!(doc.novelty, Novelty::Unchecked);
        assert_eq!(doc.extraction.title, "Greeting");
        assert_eq!(doc.fingerprint.algorithm, FingerprintAlgorithm::Simhash);
    }

    #[test]
    fn key_layout() {
        let pipeline = Pipeline::new(PipelineConfig::default());
        let doc = pipeline.process("u", PAGE).unwrap();
        let key = pipeline.novelty_key(&doc.fingerprint);
        assert_eq!(key, format!("pagesift:simhash:{}", doc.fingerprint.value));
    }

    #[test]
    fn forget_resets_novelty() {
        let store = Arc::new(InMemoryStore::new());
        let pipeline = Pipeline::new(PipelineConfig::default()).with_store(store.clone());
        let first = pipeline.process("a", PAGE).unwrap();
        assert_eq!(first.novelty, Novelty::New);
        pipeline.forget(&first.fingerprint).unwrap();
        assert_eq!(pipeline.process("b", PAGE).unwrap().novelty, Novelty::New);
        assert_eq!(store.get(&pipeline.novelty_key(&first.fingerprint)).unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn degraded_pages_are_not_recorded() {
        let store = Arc::new(InMemoryStore::new());
        let pipeline = Pipeline::new(PipelineConfig::default()).with_store(store.clone());
        assert_eq!(pipeline.process("a", "").unwrap().novelty, Novelty::Unchecked);
        assert_eq!(pipeline.process("b", "<p></p>").unwrap().novelty, Novelty::Unchecked);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn novelty_serializes_with_status_tag() {
        let json = serde_json::to_value(Novelty::Duplicate { first_seen_url: "u".into() }).unwrap();
        assert_eq!(json["status"], "duplicate");
        assert_eq!(json["first_seen_url"], "u");
    }

    #[test]
    fn concurrent_sightings_record_one_new() {
        let store = Arc::new(InMemoryStore::new());
        let pipeline = Pipeline::new(PipelineConfig::default()).with_store(store.clone());
        let verdicts: Vec<Novelty> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let pipeline = &pipeline;
                    scope.spawn(move || pipeline.process(&format!("u{i}"), PAGE).unwrap().novelty)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(verdicts.iter().filter(|v| **v == Novelty::New).count(), 1);
        assert_eq!(store.len().unwrap(), 1);
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::backend("connection refused"))
        }
        fn put(&self, _: &str, _: &str, _: Option<std::time::Duration>) -> Result<(), StoreError> {
            Ok(())
        }
        fn delete(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn store_errors_propagate() {
        let pipeline = Pipeline::new(PipelineConfig::default()).with_store(Arc::new(FailingStore));
        let err = pipeline.process("u", PAGE).unwrap_err();
        assert_eq!(err, PipelineError::Store(StoreError::Backend("connection refused".into())));
    }
}
