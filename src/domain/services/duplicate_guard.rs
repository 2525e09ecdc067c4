use std::sync::Arc;

use tracing::{debug, warn};

use super::MatchEngine;
use crate::domain::{DomainError, EmbeddingStore, EmbeddingVector, MatchResult};

/// Neighbours inspected per registration sample.
pub const DUPLICATE_SEARCH_DEPTH: usize = 5;

/// Returns the top match when it exceeds the duplicate threshold.
pub fn find_duplicate(ranked: &[MatchResult], threshold: f32) -> Option<&MatchResult> {
    ranked.first().filter(|top| top.is_above(threshold))
}

/// Registration-time check that none of the new samples belongs to an
/// individual already in the registry. Any single strongly matching sample
/// rejects the whole registration.
pub struct DuplicateGuard {
    engine: MatchEngine,
    threshold: f32,
}

impl DuplicateGuard {
    pub fn new(store: Arc<dyn EmbeddingStore>, threshold: f32) -> Self {
        Self {
            engine: MatchEngine::new(store),
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Fails fast on the first offending sample; later samples are not queried.
    pub async fn check(&self, vectors: &[EmbeddingVector]) -> Result<(), DomainError> {
        for (index, vector) in vectors.iter().enumerate() {
            let ranked = self
                .engine
                .rank(vector.values(), DUPLICATE_SEARCH_DEPTH)
                .await?;

            if let Some(top) = find_duplicate(&ranked, self.threshold) {
                warn!(
                    "Sample {} duplicates {} (similarity {:.4} > {:.2})",
                    index + 1,
                    top.tag(),
                    top.similarity(),
                    self.threshold
                );
                return Err(DomainError::DuplicateIndividual {
                    individual_id: top.individual_id().to_string(),
                    tag: top.tag().to_string(),
                    similarity: top.similarity(),
                    threshold: self.threshold,
                });
            }

            debug!(
                "Sample {} clear of duplicates (best {:.4})",
                index + 1,
                ranked.first().map(|m| m.similarity()).unwrap_or(0.0)
            );
        }
        Ok(())
    }
}
