use async_trait::async_trait;

use crate::domain::{
    DomainError, NewVerificationLog, VerificationLogEntry, VerificationOutcome,
};

/// Append-only audit trail of verification attempts.
#[async_trait]
pub trait VerificationLogRepository: Send + Sync {
    async fn append(&self, entry: NewVerificationLog) -> Result<VerificationLogEntry, DomainError>;

    /// Newest first.
    async fn list(&self, limit: Option<usize>) -> Result<Vec<VerificationLogEntry>, DomainError>;

    async fn list_for_individual(
        &self,
        individual_id: &str,
    ) -> Result<Vec<VerificationLogEntry>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;

    async fn count_by_outcome(&self, outcome: VerificationOutcome) -> Result<u64, DomainError>;
}
