use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, Individual, IndividualRepository};

/// Use case for removing an individual and everything that references it.
pub struct DeleteIndividualUseCase {
    individual_repo: Arc<dyn IndividualRepository>,
}

impl DeleteIndividualUseCase {
    pub fn new(individual_repo: Arc<dyn IndividualRepository>) -> Self {
        Self { individual_repo }
    }

    pub async fn execute(&self, id_or_tag: &str) -> Result<Individual, DomainError> {
        let individual = self
            .individual_repo
            .find_by_id_or_tag(id_or_tag)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Individual not found: {}", id_or_tag)))?;

        info!("Deleting individual: {}", individual.summary());

        let removed = self.individual_repo.delete_cascade(individual.id()).await?;

        info!(
            "Individual deleted ({} samples, {} log entries, {} transfers)",
            removed.embeddings, removed.verification_logs, removed.transfers
        );

        Ok(individual)
    }
}
