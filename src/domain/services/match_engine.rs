use std::cmp::Ordering;
use std::sync::Arc;

use crate::domain::{validate_vector, DomainError, EmbeddingStore, MatchResult};

/// Pass as `k` to rank against every stored record.
pub const ALL_MATCHES: usize = usize::MAX;

/// Cosine similarity with f64 accumulation, clamped to [-1, 1].
///
/// Neither input is assumed to be normalized. Fails with
/// `DimensionMismatch` when lengths differ and `DegenerateVector` when
/// either norm is zero or not finite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, DomainError> {
    if a.len() != b.len() {
        return Err(DomainError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 || !norm_a.is_finite() || !norm_b.is_finite() {
        return Err(DomainError::DegenerateVector);
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    Ok(similarity.clamp(-1.0, 1.0) as f32)
}

/// A stored sample as seen by the ranking function.
#[derive(Debug, Clone, Copy)]
pub struct RankCandidate<'a> {
    pub record_id: i64,
    pub individual_id: &'a str,
    pub tag: &'a str,
    pub vector: &'a [f32],
}

/// Most similar first; equal scores fall back to the lowest record id.
pub fn sort_matches(matches: &mut [MatchResult]) {
    matches.sort_by(|a, b| {
        b.similarity()
            .partial_cmp(&a.similarity())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.record_id().cmp(&b.record_id()))
    });
}

/// Exact ranking over every candidate. Pure: same inputs, same output.
pub fn rank<'a, I>(query: &[f32], candidates: I, k: usize) -> Result<Vec<MatchResult>, DomainError>
where
    I: IntoIterator<Item = RankCandidate<'a>>,
{
    validate_vector(query)?;

    let mut matches = candidates
        .into_iter()
        .map(|c| {
            cosine_similarity(query, c.vector).map(|similarity| {
                MatchResult::new(
                    c.individual_id.to_string(),
                    c.tag.to_string(),
                    similarity,
                    c.record_id,
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    sort_matches(&mut matches);
    matches.truncate(k);
    Ok(matches)
}

/// Ranks probes against whatever store it is given. Holds no state of its
/// own and never writes.
#[derive(Clone)]
pub struct MatchEngine {
    store: Arc<dyn EmbeddingStore>,
}

impl MatchEngine {
    pub fn new(store: Arc<dyn EmbeddingStore>) -> Self {
        Self { store }
    }

    pub async fn rank(&self, query: &[f32], k: usize) -> Result<Vec<MatchResult>, DomainError> {
        validate_vector(query)?;
        if k == 0 {
            return Err(DomainError::validation("k must be at least 1"));
        }

        let mut matches = self.store.query_nearest(query, k).await?;
        sort_matches(&mut matches);
        matches.truncate(k);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EMBEDDING_DIMENSIONS;

    fn unit_vector(hot: usize) -> Vec<f32> {
        let mut v = vec![0.0; EMBEDDING_DIMENSIONS];
        v[hot] = 1.0;
        v
    }

    fn blend(a: f32, hot: usize) -> Vec<f32> {
        let mut v = vec![0.0; EMBEDDING_DIMENSIONS];
        v[0] = a;
        v[hot] = (1.0 - a * a).sqrt();
        v
    }

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        let a = unit_vector(0);
        let b = unit_vector(1);
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&a, &b).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_cosine_does_not_assume_normalized_input() {
        let a: Vec<f32> = unit_vector(0).iter().map(|v| v * 7.5).collect();
        let b = blend(0.6, 3);
        assert!((cosine_similarity(&a, &b).unwrap() - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let a = blend(0.3, 5);
        let b: Vec<f32> = (0..EMBEDDING_DIMENSIONS).map(|i| (i as f32).sin()).collect();
        assert_eq!(
            cosine_similarity(&a, &b).unwrap(),
            cosine_similarity(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_cosine_errors() {
        assert!(matches!(
            cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]),
            Err(DomainError::DimensionMismatch { expected: 2, actual: 3 })
        ));
        assert!(matches!(
            cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]),
            Err(DomainError::DegenerateVector)
        ));
    }

    #[test]
    fn test_rank_orders_and_breaks_ties_by_record_id() {
        let near = blend(0.9, 1);
        let same_a = blend(0.5, 2);
        let same_b = blend(0.5, 3);
        let candidates = vec![
            RankCandidate { record_id: 9, individual_id: "b", tag: "TW-B", vector: &same_b },
            RankCandidate { record_id: 4, individual_id: "a", tag: "TW-A", vector: &same_a },
            RankCandidate { record_id: 7, individual_id: "c", tag: "TW-C", vector: &near },
        ];

        let query = unit_vector(0);
        let ranked = rank(&query, candidates.clone(), ALL_MATCHES).unwrap();
        let ids: Vec<i64> = ranked.iter().map(|m| m.record_id()).collect();
        assert_eq!(ids, vec![7, 4, 9]);

        let again = rank(&query, candidates, ALL_MATCHES).unwrap();
        assert_eq!(ranked, again);
    }

    #[test]
    fn test_rank_truncates_and_handles_empty() {
        let v = unit_vector(0);
        let candidates = (0..4).map(|i| RankCandidate {
            record_id: i,
            individual_id: "a",
            tag: "TW-A",
            vector: &v,
        });
        assert_eq!(rank(&v, candidates, 2).unwrap().len(), 2);
        assert!(rank(&v, std::iter::empty(), 5).unwrap().is_empty());
    }

    #[test]
    fn test_rank_rejects_bad_query_even_with_empty_store() {
        assert!(matches!(
            rank(&[1.0; 255], std::iter::empty(), 5),
            Err(DomainError::DimensionMismatch { .. })
        ));
    }
}
