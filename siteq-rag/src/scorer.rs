//! Cosine similarity scoring and result selection.
//!
//! Scoring is a single pass over the store's vectors; selection then
//! applies one of two policies:
//!
//! - [`SelectionPolicy::MaxGate`]: gate on the *maximum* similarity only;
//!   below the threshold the whole query is a miss, at or above it the top
//!   `top_n` records are returned regardless of their individual scores.
//! - [`SelectionPolicy::PerRecord`]: keep every record at or above the
//!   threshold, rank the survivors, return up to `top_n`.
//!
//! Neither threshold nor `top_n` is ever auto-tuned.

use serde::{Deserialize, Serialize};

/// Compute cosine similarity between two vectors.
///
/// Defined as 0.0 when either vector has zero magnitude, so zero vectors
/// never divide by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score a query vector against every document vector in one pass.
pub fn score_all(query: &[f32], vectors: &[Vec<f32>]) -> Vec<f32> {
    vectors.iter().map(|v| cosine_similarity(query, v)).collect()
}

/// Indices sorted by score descending, stable by original index on ties.
pub fn rank_descending(scores: &[f32]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    // Vec::sort_by is stable, so equal scores keep their original order.
    indices.sort_by(|&a, &b| {
        scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}

/// An index into the store paired with its similarity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredIndex {
    /// Record index at scoring time.
    pub index: usize,
    /// Cosine similarity against the query vector.
    pub score: f32,
}

/// Outcome of applying a [`SelectionPolicy`] to a scored store.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// The gate rejected the query outright. Distinct from an empty match
    /// list: the maximum similarity is reported for logging.
    NoMatch {
        /// Highest similarity observed (0.0 for an empty store).
        max_score: f32,
    },
    /// Selected indices, ranked by score descending. May be empty under
    /// the per-record policy.
    Matches(Vec<ScoredIndex>),
}

impl Selection {
    /// The selected indices, treating a gate rejection as empty.
    pub fn into_matches(self) -> Vec<ScoredIndex> {
        match self {
            Selection::NoMatch { .. } => Vec::new(),
            Selection::Matches(matches) => matches,
        }
    }
}

/// How scored records are admitted into the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum SelectionPolicy {
    /// Gate on the maximum similarity; admit the top `top_n` wholesale.
    MaxGate {
        /// Minimum acceptable maximum similarity.
        threshold: f32,
        /// Number of records returned on a pass.
        top_n: usize,
    },
    /// Admit every record at or above `threshold`, up to `top_n`.
    PerRecord {
        /// Minimum acceptable per-record similarity.
        threshold: f32,
        /// Cap on the number of survivors returned.
        top_n: usize,
    },
}

impl SelectionPolicy {
    /// Apply the policy to a full score vector.
    pub fn select(&self, scores: &[f32]) -> Selection {
        match *self {
            SelectionPolicy::MaxGate { threshold, top_n } => {
                if scores.is_empty() {
                    return Selection::NoMatch { max_score: 0.0 };
                }
                let max_score = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                if max_score < threshold {
                    return Selection::NoMatch { max_score };
                }
                let selected = rank_descending(scores)
                    .into_iter()
                    .take(top_n)
                    .map(|index| ScoredIndex { index, score: scores[index] })
                    .collect();
                Selection::Matches(selected)
            }
            SelectionPolicy::PerRecord { threshold, top_n } => {
                let survivors = rank_descending(scores)
                    .into_iter()
                    .filter(|&index| scores[index] >= threshold)
                    .take(top_n)
                    .map(|index| ScoredIndex { index, score: scores[index] })
                    .collect();
                Selection::Matches(survivors)
            }
        }
    }

    /// The policy's configured result cap.
    pub fn top_n(&self) -> usize {
        match *self {
            SelectionPolicy::MaxGate { top_n, .. } | SelectionPolicy::PerRecord { top_n, .. } => {
                top_n
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vector_scores_zero() {
        let q = vec![0.3, -0.2, 0.9];
        let zero = vec![0.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&q, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &q), 0.0);
    }

    #[test]
    fn identical_vectors_score_one() {
        let v = vec![0.6, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let scores = [0.5, 0.9, 0.5, 0.1];
        assert_eq!(rank_descending(&scores), vec![1, 0, 2, 3]);
    }

    #[test]
    fn max_gate_rejects_below_threshold() {
        let policy = SelectionPolicy::MaxGate { threshold: 0.5, top_n: 5 };
        let selection = policy.select(&[0.1, 0.49, 0.3]);
        assert_eq!(selection, Selection::NoMatch { max_score: 0.49 });
    }

    #[test]
    fn max_gate_on_empty_store_is_no_match() {
        let policy = SelectionPolicy::MaxGate { threshold: 0.5, top_n: 5 };
        assert_eq!(policy.select(&[]), Selection::NoMatch { max_score: 0.0 });
    }

    #[test]
    fn max_gate_admits_low_scores_once_open() {
        // One record clears the gate; the rest ride along regardless.
        let policy = SelectionPolicy::MaxGate { threshold: 0.5, top_n: 3 };
        let Selection::Matches(matches) = policy.select(&[0.05, 0.7, 0.2]) else {
            panic!("gate should open");
        };
        let indices: Vec<usize> = matches.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![1, 2, 0]);
    }

    #[test]
    fn per_record_keeps_only_survivors() {
        let policy = SelectionPolicy::PerRecord { threshold: 0.5, top_n: 5 };
        let Selection::Matches(matches) = policy.select(&[0.05, 0.7, 0.2, 0.55]) else {
            panic!("per-record never gates");
        };
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].index, 1);
        assert_eq!(matches[1].index, 3);
        assert!(matches.iter().all(|m| m.score >= 0.5));
    }

    #[test]
    fn per_record_below_threshold_is_empty_list() {
        let policy = SelectionPolicy::PerRecord { threshold: 0.9, top_n: 5 };
        assert_eq!(policy.select(&[0.1, 0.2]), Selection::Matches(Vec::new()));
    }
}
