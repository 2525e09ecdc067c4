use async_trait::async_trait;

use crate::domain::{DomainError, EmbeddingRecord, MatchResult, NewEmbeddingRecord};

/// Durable, append-only storage of nose-print samples with exact
/// nearest-neighbour search by cosine similarity.
#[async_trait]
pub trait EmbeddingStore: Send + Sync {
    /// Validates and appends one record, returning its id. Fails with
    /// `DimensionMismatch` or `DegenerateVector` for unusable vectors.
    /// The record is visible to queries as soon as this returns.
    async fn insert(&self, record: NewEmbeddingRecord) -> Result<i64, DomainError>;

    /// Scans every stored record and returns the `k` most similar, best
    /// first, ties broken by lowest record id. Empty store gives an empty
    /// list.
    async fn query_nearest(&self, query: &[f32], k: usize)
        -> Result<Vec<MatchResult>, DomainError>;

    /// Removes every record of one individual atomically.
    /// Returns the number of records deleted.
    async fn delete_individual(&self, individual_id: &str) -> Result<u64, DomainError>;

    async fn records_for(&self, individual_id: &str) -> Result<Vec<EmbeddingRecord>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;

    async fn count_for(&self, individual_id: &str) -> Result<u64, DomainError>;
}
