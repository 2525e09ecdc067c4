use std::sync::Arc;

use crate::domain::{DomainError, VerificationLogEntry, VerificationLogRepository};

pub struct VerificationHistoryUseCase {
    log_repo: Arc<dyn VerificationLogRepository>,
}

impl VerificationHistoryUseCase {
    pub fn new(log_repo: Arc<dyn VerificationLogRepository>) -> Self {
        Self { log_repo }
    }

    /// Newest first.
    pub async fn execute(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<VerificationLogEntry>, DomainError> {
        self.log_repo.list(limit).await
    }

    pub async fn for_individual(
        &self,
        individual_id: &str,
    ) -> Result<Vec<VerificationLogEntry>, DomainError> {
        self.log_repo.list_for_individual(individual_id).await
    }
}
