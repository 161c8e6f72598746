use std::io::Write;
use std::sync::Arc;

use pagesift::{
    estimate_jaccard, minhash_signature, rank_against, Algorithm, FingerprintAlgorithm,
    InMemoryStore, KeyValueStore, Novelty, Pipeline, PipelineConfig, PipelineError,
    RegionSource, TextDocument,
};
use tempfile::NamedTempFile;

const ORIGINAL: &str = r#"<html><head>
<meta property="og:title" content="Release notes for version two">
<title>Release notes | Example Blog</title></head><body>
<nav><a href="/">Home</a> <a href="/about">About</a></nav>
<article><h1>Release notes</h1>
<p>Version two adds <strong>streaming parsers</strong>, faster startup and a smaller binary.</p>
<p>Upgrading is a drop-in change for most users.</p></article>
<footer>Copyright Example Blog</footer></body></html>"#;

const MIRROR: &str = r#"<html><head><title>Release notes for version two</title></head><body>
<div class="sidebar">Trending now</div>
<main><h1>Release notes</h1>
<p>Version two adds <em>streaming parsers</em>, faster startup and a smaller binary.</p>
<p>Upgrading is a drop-in change for most users.</p></main></body></html>"#;

const UNRELATED: &str = r#"<html><head><title>Bread</title></head><body>
<article><p>Bake bread at home. Knead dough gently, rest overnight, then bake until golden.</p>
</article></body></html>"#;

fn store_backed(cfg: PipelineConfig) -> (Pipeline, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    (Pipeline::new(cfg).with_store(store.clone()), store)
}

#[test]
fn mirrored_page_is_reported_as_duplicate() -> Result<(), PipelineError> {
    let (pipeline, store) = store_backed(PipelineConfig::default());

    let original = pipeline.process("https://blog.example/notes", ORIGINAL)?;
    assert_eq!(original.novelty, Novelty::New);
    assert_eq!(original.extraction.title, "Release notes for version two");
    assert_eq!(
        original.extraction.region,
        RegionSource::SemanticTag { tag: "article".into() }
    );
    assert!(!original.extraction.content.contains("Copyright"));
    assert!(original
        .extraction
        .highlights
        .iter()
        .any(|h| h.text == "streaming parsers"));

    let mirror = pipeline.process("https://mirror.example/copy", MIRROR)?;
    assert_eq!(mirror.extraction.content, original.extraction.content);
    assert_eq!(mirror.fingerprint, original.fingerprint);
    assert_eq!(
        mirror.novelty,
        Novelty::Duplicate {
            first_seen_url: "https://blog.example/notes".into()
        }
    );

    let unrelated = pipeline.process("https://food.example/bread", UNRELATED)?;
    assert_eq!(unrelated.novelty, Novelty::New);
    assert_eq!(store.len().unwrap(), 2);
    Ok(())
}

#[test]
fn every_fingerprint_family_keys_the_store() -> Result<(), PipelineError> {
    for algorithm in FingerprintAlgorithm::ALL {
        let mut cfg = PipelineConfig::default();
        cfg.similarity.fingerprint_algorithm = algorithm;
        let (pipeline, store) = store_backed(cfg);

        let doc = pipeline.process("first", ORIGINAL)?;
        assert_eq!(doc.fingerprint.algorithm, algorithm);
        let key = pipeline.novelty_key(&doc.fingerprint);
        assert!(key.starts_with(&format!("pagesift:{algorithm}:")));
        assert_eq!(store.get(&key).unwrap().as_deref(), Some("first"));

        let again = pipeline.process("second", MIRROR)?;
        assert_eq!(
            again.novelty,
            Novelty::Duplicate {
                first_seen_url: "first".into()
            },
            "{algorithm}"
        );
    }
    Ok(())
}

#[test]
fn processed_documents_cluster_by_content() -> Result<(), PipelineError> {
    let pipeline = Pipeline::new(PipelineConfig::default());
    let docs = vec![
        pipeline.process("a", ORIGINAL)?,
        pipeline.process("b", UNRELATED)?,
        pipeline.process("c", MIRROR)?,
    ];

    let report = pipeline.cluster(&docs)?;
    assert_eq!(report.total_processed, 3);
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].representative, "a");
    assert_eq!(report.groups[0].members, vec!["a".to_string(), "c".to_string()]);
    assert_eq!(report.groups[0].similarity, 1.0);
    assert_eq!(report.unique_documents, vec!["b".to_string()]);
    Ok(())
}

#[test]
fn parallel_clustering_matches_sequential() -> Result<(), PipelineError> {
    let docs: Vec<TextDocument> = (0..40)
        .map(|i| {
            TextDocument::new(
                format!("doc-{i}"),
                format!("shared words about topic {} and variant {}", i % 4, i % 7),
            )
        })
        .collect();

    let sequential = Pipeline::new(PipelineConfig::default()).cluster_texts(&docs)?;
    let mut cfg = PipelineConfig::default();
    cfg.similarity.use_parallel = true;
    let parallel = Pipeline::new(cfg).cluster_texts(&docs)?;
    assert_eq!(sequential, parallel);
    Ok(())
}

#[test]
fn pipeline_from_yaml_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    file.write_all(
        br#"
version: "1.0"
name: "integration"
similarity:
  algorithm: "jaccard"
  threshold: 0.5
  fingerprint_algorithm: "shingle"
fingerprint:
  shingle_width: 4
store:
  key_prefix: "crawl"
  ttl_secs: 3600
"#,
    )?;
    let cfg = PipelineConfig::from_file(file.path())?;
    let (pipeline, store) = store_backed(cfg);

    let doc = pipeline.process("u", ORIGINAL)?;
    assert_eq!(doc.fingerprint.algorithm, FingerprintAlgorithm::Shingle);
    assert_eq!(doc.fingerprint.value.len(), 16);
    assert!(pipeline.novelty_key(&doc.fingerprint).starts_with("crawl:shingle:"));
    assert_eq!(store.len()?, 1);
    assert_eq!(pipeline.config().similarity.algorithm, Algorithm::Jaccard);
    Ok(())
}

#[test]
fn invalid_threshold_surfaces_as_pipeline_error() {
    let mut cfg = PipelineConfig::default();
    cfg.similarity.threshold = 2.0;
    let err = Pipeline::new(cfg).cluster_texts(&[]).unwrap_err();
    assert!(matches!(err, PipelineError::Similarity(_)));
}

#[test]
fn ranking_and_signature_estimates_agree_on_order() -> Result<(), PipelineError> {
    let pipeline = Pipeline::new(PipelineConfig::default());
    let base = pipeline.process("a", ORIGINAL)?.extraction.content;
    let mirror = pipeline.process("b", MIRROR)?.extraction.content;
    let unrelated = pipeline.process("c", UNRELATED)?.extraction.content;

    let ranked = rank_against(&base, &[&unrelated, &mirror], 0.8, Algorithm::Jaccard)?;
    assert_eq!(ranked[0].index, 1);
    assert!(ranked[0].is_match);
    assert!(!ranked[1].is_match);

    let cfg = &pipeline.config().fingerprint;
    let sig_base = minhash_signature(&base, cfg)?;
    let near = estimate_jaccard(&sig_base, &minhash_signature(&mirror, cfg)?)?;
    let far = estimate_jaccard(&sig_base, &minhash_signature(&unrelated, cfg)?)?;
    assert_eq!(near, 1.0);
    assert!(far < near);
    Ok(())
}
