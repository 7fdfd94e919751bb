//! Similarity Ranker: pluggable, trait-based ranking of catalog entries
//! against a query vector.
//!
//! Default: `LinearRanker` (full scan, exact cosine). An indexed backend can
//! implement `Ranker` as long as it keeps the same ordering semantics:
//! descending score, ties broken by catalog insertion order.

use crate::catalog::CatalogSnapshot;
use crate::embedding::EmbeddingError;
use crate::models::assessment::Assessment;
use crate::recommendation::error::{InputError, RecommendError};

/// A catalog entry paired with its similarity to the query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredAssessment<'a> {
    pub assessment: &'a Assessment,
    pub score: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    pub top_k: usize,
    /// Results scoring strictly below this are dropped. `None` keeps everything.
    pub min_score: Option<f32>,
}

pub trait Ranker: Send + Sync {
    fn rank<'a>(
        &self,
        query: &[f32],
        snapshot: &'a CatalogSnapshot,
        options: RankOptions,
    ) -> Result<Vec<ScoredAssessment<'a>>, RecommendError>;

    fn name(&self) -> &'static str;
}

/// Exact cosine over every entry. O(n × D) per query, which is fine for a
/// catalog of a few hundred assessments.
pub struct LinearRanker;

impl Ranker for LinearRanker {
    fn rank<'a>(
        &self,
        query: &[f32],
        snapshot: &'a CatalogSnapshot,
        options: RankOptions,
    ) -> Result<Vec<ScoredAssessment<'a>>, RecommendError> {
        if options.top_k == 0 {
            return Err(InputError::InvalidTopK(0).into());
        }
        if query.len() != snapshot.dimension() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: snapshot.dimension(),
                actual: query.len(),
            }
            .into());
        }

        let query_norm = norm(query);
        let mut scored: Vec<ScoredAssessment<'a>> = snapshot
            .assessments()
            .iter()
            .map(|assessment| ScoredAssessment {
                assessment,
                score: cosine_with_norm(query, query_norm, &assessment.embedding),
            })
            .filter(|s| options.min_score.map_or(true, |floor| s.score >= floor))
            .collect();

        // Stable sort: equal scores keep catalog order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(options.top_k);
        Ok(scored)
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

/// dot(a, b) / (|a| |b|), or 0.0 when either side has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    cosine_with_norm(a, norm(a), b)
}

fn cosine_with_norm(a: &[f32], a_norm: f64, b: &[f32]) -> f32 {
    let b_norm = norm(b);
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    // f64 accumulation: squares of large f32 components overflow f32.
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    (dot / (a_norm * b_norm)).clamp(-1.0, 1.0) as f32
}

fn norm(v: &[f32]) -> f64 {
    v.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::snapshot;

    fn opts(top_k: usize) -> RankOptions {
        RankOptions {
            top_k,
            min_score: None,
        }
    }

    fn ids(ranked: &[ScoredAssessment<'_>]) -> Vec<String> {
        ranked.iter().map(|s| s.assessment.id.clone()).collect()
    }

    /// Small deterministic generator so property-style tests need no extra crates.
    struct Lcg(u64);

    impl Lcg {
        fn next_f32(&mut self) -> f32 {
            self.0 = self
                .0
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((self.0 >> 40) as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
        }

        fn vector(&mut self, dim: usize) -> Vec<f32> {
            (0..dim).map(|_| self.next_f32()).collect()
        }
    }

    #[test]
    fn test_self_similarity_is_one() {
        let v = vec![0.3, -1.2, 4.5, 0.01];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]), 0.0);
        assert!(!cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]).is_nan());
    }

    #[test]
    fn test_opposite_vectors_score_minus_one() {
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_ignores_magnitude() {
        let a = cosine_similarity(&[1.0, 1.0], &[2.0, 0.0]);
        let b = cosine_similarity(&[10.0, 10.0], &[0.5, 0.0]);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_huge_components_do_not_overflow() {
        let big = [1e20_f32, 1e20];
        assert!((cosine_similarity(&big, &big) - 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 1.0], &big) - 1.0).abs() < 1e-6);
        let max = [f32::MAX, f32::MAX];
        assert!((cosine_similarity(&max, &[1.0, 1.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_huge_catalog_vector_ranks_by_direction() {
        let catalog = snapshot(vec![("far", vec![-1.0, 0.0]), ("same", vec![1e20, 1e20])]);
        let ranked = LinearRanker.rank(&[1.0, 1.0], &catalog, opts(2)).unwrap();
        assert_eq!(ids(&ranked), vec!["same", "far"]);
        assert!((ranked[0].score - 1.0).abs() < 1e-6);
        assert!((ranked[1].score + std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_closest_two_in_order() {
        let catalog = snapshot(vec![
            ("A", vec![1.0, 0.0]),
            ("B", vec![0.0, 1.0]),
            ("C", vec![0.9, 0.1]),
        ]);
        let ranked = LinearRanker.rank(&[1.0, 0.0], &catalog, opts(2)).unwrap();
        assert_eq!(ids(&ranked), vec!["A", "C"]);
        assert!((ranked[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_top_k_larger_than_catalog_returns_all() {
        let catalog = snapshot(vec![
            ("A", vec![1.0, 0.0]),
            ("B", vec![0.0, 1.0]),
            ("C", vec![0.9, 0.1]),
        ]);
        let ranked = LinearRanker.rank(&[1.0, 0.0], &catalog, opts(10)).unwrap();
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let catalog = snapshot(vec![
            ("first", vec![0.0, 1.0]),
            ("twin-1", vec![1.0, 1.0]),
            ("middle", vec![-1.0, 0.0]),
            ("twin-2", vec![1.0, 1.0]),
        ]);
        let ranked = LinearRanker.rank(&[1.0, 1.0], &catalog, opts(2)).unwrap();
        assert_eq!(ids(&ranked), vec!["twin-1", "twin-2"]);
    }

    #[test]
    fn test_zero_query_keeps_catalog_order() {
        let catalog = snapshot(vec![("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0])]);
        let ranked = LinearRanker.rank(&[0.0, 0.0], &catalog, opts(5)).unwrap();
        assert_eq!(ids(&ranked), vec!["a", "b"]);
        assert!(ranked.iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let catalog = snapshot(vec![("a", vec![1.0])]);
        let err = LinearRanker.rank(&[1.0], &catalog, opts(0)).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::Input(InputError::InvalidTopK(0))
        ));
    }

    #[test]
    fn test_query_dimension_mismatch_rejected() {
        let catalog = snapshot(vec![("a", vec![1.0, 0.0])]);
        let err = LinearRanker
            .rank(&[1.0, 0.0, 0.0], &catalog, opts(1))
            .unwrap_err();
        assert!(matches!(
            err,
            RecommendError::Embedding(EmbeddingError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_min_score_drops_low_matches() {
        let catalog = snapshot(vec![
            ("A", vec![1.0, 0.0]),
            ("B", vec![0.0, 1.0]),
            ("C", vec![0.9, 0.1]),
        ]);
        let ranked = LinearRanker
            .rank(
                &[1.0, 0.0],
                &catalog,
                RankOptions {
                    top_k: 10,
                    min_score: Some(0.5),
                },
            )
            .unwrap();
        assert_eq!(ids(&ranked), vec!["A", "C"]);
    }

    #[test]
    fn test_length_and_ordering_hold_for_random_catalogs() {
        let mut rng = Lcg(42);
        for size in 1..=20 {
            let entries: Vec<(String, Vec<f32>)> =
                (0..size).map(|i| (format!("e{i}"), rng.vector(8))).collect();
            let catalog = snapshot(
                entries
                    .iter()
                    .map(|(id, v)| (id.as_str(), v.clone()))
                    .collect(),
            );
            let query = rng.vector(8);

            for top_k in [1, 3, 10, 25] {
                let ranked = LinearRanker.rank(&query, &catalog, opts(top_k)).unwrap();
                assert_eq!(ranked.len(), top_k.min(size));
                assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
                assert!(ranked.iter().all(|s| (-1.0..=1.0).contains(&s.score)));
            }
        }
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let mut rng = Lcg(7);
        let entries: Vec<(String, Vec<f32>)> =
            (0..15).map(|i| (format!("e{i}"), rng.vector(4))).collect();
        let catalog = snapshot(
            entries
                .iter()
                .map(|(id, v)| (id.as_str(), v.clone()))
                .collect(),
        );
        let query = rng.vector(4);

        let first = LinearRanker.rank(&query, &catalog, opts(5)).unwrap();
        let second = LinearRanker.rank(&query, &catalog, opts(5)).unwrap();
        assert_eq!(ids(&first), ids(&second));
    }
}
