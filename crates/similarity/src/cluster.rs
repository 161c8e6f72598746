//! Near-duplicate grouping and ranked batch comparison.
//!
//! Clustering is a greedy single pass in input order. Each unassigned
//! document opens a group and pulls in every later unassigned document that
//! scores at or above the threshold against it. Membership is judged against
//! the group's first document only, so groups are not transitive: with
//! `d1~d2` and `d2~d3` above the threshold but `d1~d3` below it, `d3` stays
//! out of the `{d1, d2}` group.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, Level};

use crate::algorithm::Algorithm;
use crate::config::{ClusterConfig, KeywordConfig};
use crate::error::{check_threshold, SimilarityError};
use crate::metrics::{score_prepared, PreparedText};

/// A document to cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocument {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl TextDocument {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Documents judged near-duplicates of one representative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Representative first, then members in input order.
    pub members: Vec<String>,
    /// The first-seen member.
    pub representative: String,
    /// Highest score observed while forming the group.
    pub similarity: f64,
}

/// Partition of the input: every document id lands in exactly one group or
/// in `unique_documents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub groups: Vec<DuplicateGroup>,
    pub unique_documents: Vec<String>,
    pub total_processed: usize,
}

/// Group near-duplicate documents.
pub fn cluster_duplicates(
    docs: &[TextDocument],
    threshold: f64,
    algorithm: Algorithm,
    cfg: &ClusterConfig,
) -> Result<ClusterReport, SimilarityError> {
    check_threshold(threshold)?;
    cfg.keywords.validate()?;

    let start = Instant::now();
    let span = tracing::span!(
        Level::INFO,
        "similarity.cluster",
        documents = docs.len(),
        algorithm = %algorithm,
        threshold
    );
    let _guard = span.enter();

    let prepared: Vec<PreparedText<'_>> = if cfg.use_parallel {
        docs.par_iter()
            .map(|d| PreparedText::new(&d.content, algorithm, &cfg.keywords))
            .collect()
    } else {
        docs.iter()
            .map(|d| PreparedText::new(&d.content, algorithm, &cfg.keywords))
            .collect()
    };

    let mut assigned = vec![false; docs.len()];
    let mut groups = Vec::new();
    let mut unique_documents = Vec::new();

    for i in 0..docs.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;

        let candidates: Vec<usize> = (i + 1..docs.len()).filter(|&j| !assigned[j]).collect();
        // Scores within a row are independent; only assignment is ordered.
        let scores: Vec<f64> = if cfg.use_parallel {
            candidates
                .par_iter()
                .map(|&j| score_prepared(&prepared[i], &prepared[j], algorithm).value)
                .collect()
        } else {
            candidates
                .iter()
                .map(|&j| score_prepared(&prepared[i], &prepared[j], algorithm).value)
                .collect()
        };

        let mut members = vec![docs[i].id.clone()];
        let mut best = 0.0f64;
        for (&j, score) in candidates.iter().zip(scores) {
            if score >= threshold {
                assigned[j] = true;
                members.push(docs[j].id.clone());
                best = best.max(score);
            }
        }

        if members.len() > 1 {
            debug!(representative = %docs[i].id, members = members.len(), similarity = best, "duplicate_group");
            groups.push(DuplicateGroup {
                members,
                representative: docs[i].id.clone(),
                similarity: best,
            });
        } else {
            unique_documents.push(docs[i].id.clone());
        }
    }

    info!(
        groups = groups.len(),
        unique = unique_documents.len(),
        elapsed_micros = start.elapsed().as_micros(),
        "cluster_complete"
    );

    Ok(ClusterReport {
        groups,
        unique_documents,
        total_processed: docs.len(),
    })
}

/// One candidate's standing against a base text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    /// Position in the candidate slice.
    pub index: usize,
    pub similarity: f64,
    pub is_match: bool,
}

/// Score every candidate against `base`, best first.
///
/// Equal scores keep candidate order.
pub fn rank_against<S>(
    base: &str,
    candidates: &[S],
    threshold: f64,
    algorithm: Algorithm,
) -> Result<Vec<RankedMatch>, SimilarityError>
where
    S: AsRef<str>,
{
    check_threshold(threshold)?;
    let keywords = KeywordConfig::default();
    let base = PreparedText::new(base, algorithm, &keywords);

    let mut ranked: Vec<RankedMatch> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let other = PreparedText::new(candidate.as_ref(), algorithm, &keywords);
            let similarity = score_prepared(&base, &other, algorithm).value;
            RankedMatch {
                index,
                similarity,
                is_match: similarity >= threshold,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn docs(contents: &[&str]) -> Vec<TextDocument> {
        contents
            .iter()
            .enumerate()
            .map(|(i, c)| TextDocument::new(format!("d{}", i + 1), *c))
            .collect()
    }

    fn cluster(docs: &[TextDocument], threshold: f64, algorithm: Algorithm) -> ClusterReport {
        cluster_duplicates(docs, threshold, algorithm, &ClusterConfig::default()).expect("valid")
    }

    #[test]
    fn greedy_grouping_is_not_transitive() {
        // jaccard: d1~d2 = 0.8333, d2~d3 = 0.7143, d1~d3 = 0.5714
        let input = docs(&["a b c d e", "a b c d e f", "b c d e f g"]);
        let report = cluster(&input, 0.7, Algorithm::Jaccard);
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].members, vec!["d1", "d2"]);
        assert_eq!(report.groups[0].representative, "d1");
        assert_eq!(report.groups[0].similarity, 0.8333);
        assert_eq!(report.unique_documents, vec!["d3"]);
        assert_eq!(report.total_processed, 3);
    }

    #[test]
    fn group_similarity_is_max() {
        let input = docs(&["a b c d", "a b c d", "a b c x"]);
        let report = cluster(&input, 0.5, Algorithm::Jaccard);
        assert_eq!(report.groups[0].members, vec!["d1", "d2", "d3"]);
        assert_eq!(report.groups[0].similarity, 1.0);
    }

    #[test]
    fn partitions_input_for_any_threshold() {
        let input = docs(&[
            "rust ownership model",
            "rust ownership model explained",
            "garbage collection pauses",
            "",
            "rust borrow checker",
            "garbage collection pauses in java",
        ]);
        for threshold in [0.0, 0.25, 0.5, 0.75, 1.0] {
            for algorithm in Algorithm::ALL {
                let report = cluster(&input, threshold, algorithm);
                let mut seen = HashSet::new();
                let mut count = 0;
                for id in report
                    .groups
                    .iter()
                    .flat_map(|g| g.members.iter())
                    .chain(report.unique_documents.iter())
                {
                    assert!(seen.insert(id.clone()), "{id} assigned twice");
                    count += 1;
                }
                assert_eq!(count, input.len(), "{algorithm} @ {threshold}");
            }
        }
    }

    #[test]
    fn parallel_equals_sequential() {
        let input: Vec<TextDocument> = (0..40)
            .map(|i| TextDocument::new(format!("d{i}"), format!("shared words here variant {}", i % 7)))
            .collect();
        let seq = cluster_duplicates(&input, 0.8, Algorithm::Cosine, &ClusterConfig::default())
            .expect("valid");
        let par = cluster_duplicates(
            &input,
            0.8,
            Algorithm::Cosine,
            &ClusterConfig::default().with_parallel(true),
        )
        .expect("valid");
        assert_eq!(seq, par);
    }

    #[test]
    fn invalid_threshold_rejected() {
        let input = docs(&["a", "b"]);
        for bad in [-0.1, 1.1, f64::NAN] {
            let err = cluster_duplicates(&input, bad, Algorithm::Cosine, &ClusterConfig::default())
                .expect_err("out of range");
            assert!(matches!(err, SimilarityError::InvalidThreshold(_)));
        }
    }

    #[test]
    fn empty_input() {
        let report = cluster(&[], 0.8, Algorithm::Cosine);
        assert!(report.groups.is_empty());
        assert!(report.unique_documents.is_empty());
        assert_eq!(report.total_processed, 0);
    }

    #[test]
    fn rank_sorted_descending_and_stable() {
        let base = "alpha beta gamma delta";
        let candidates = ["zeta eta", "alpha beta gamma delta", "alpha beta", "theta iota"];
        let ranked = rank_against(base, &candidates, 0.4, Algorithm::Jaccard).expect("valid");
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![1, 2, 0, 3]);
        assert!(ranked[0].is_match && ranked[1].is_match);
        assert_eq!(ranked[1].similarity, 0.5);
        assert!(!ranked[2].is_match);
    }

    #[test]
    fn rank_rejects_bad_threshold() {
        assert!(rank_against("a", &["b"], 2.0, Algorithm::Cosine).is_err());
    }
}
