use async_trait::async_trait;

use crate::domain::{DomainError, Individual, OwnershipTransfer};

/// Rows removed by [`IndividualRepository::delete_cascade`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeDeletion {
    pub embeddings: u64,
    pub verification_logs: u64,
    pub transfers: u64,
}

/// Persistence of registered individuals and their ownership history.
#[async_trait]
pub trait IndividualRepository: Send + Sync {
    /// Inserts a new individual. Tags are unique.
    async fn save(&self, individual: &Individual) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Individual>, DomainError>;

    async fn find_by_tag(&self, tag: &str) -> Result<Option<Individual>, DomainError>;

    /// Operators may address an individual by id or by tag.
    async fn find_by_id_or_tag(&self, key: &str) -> Result<Option<Individual>, DomainError> {
        match self.find_by_id(key).await? {
            Some(individual) => Ok(Some(individual)),
            None => self.find_by_tag(key).await,
        }
    }

    /// All individuals ordered by tag.
    async fn list(&self) -> Result<Vec<Individual>, DomainError>;

    /// Stores the updated individual and its transfer record together.
    async fn apply_transfer(
        &self,
        individual: &Individual,
        transfer: &OwnershipTransfer,
    ) -> Result<(), DomainError>;

    /// Transfer history, oldest first.
    async fn transfers_for(&self, id: &str) -> Result<Vec<OwnershipTransfer>, DomainError>;

    /// Deletes the individual row and its transfer history. Deleting an
    /// unknown id is not an error.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    /// Removes the individual together with its embeddings, verification
    /// logs and transfers. Either every row goes or none does.
    async fn delete_cascade(&self, id: &str) -> Result<CascadeDeletion, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
