use std::sync::Arc;

use serde::Serialize;

use crate::domain::{
    DomainError, EmbeddingStore, IndividualRepository, IndividualSummary, OwnershipTransfer,
};

/// One individual with its samples (without vectors) and transfer history.
#[derive(Debug, Clone, Serialize)]
pub struct IndividualDetails {
    pub summary: IndividualSummary,
    pub sample_labels: Vec<String>,
    pub transfers: Vec<OwnershipTransfer>,
}

pub struct ListIndividualsUseCase {
    individual_repo: Arc<dyn IndividualRepository>,
    embedding_store: Arc<dyn EmbeddingStore>,
}

impl ListIndividualsUseCase {
    pub fn new(
        individual_repo: Arc<dyn IndividualRepository>,
        embedding_store: Arc<dyn EmbeddingStore>,
    ) -> Self {
        Self {
            individual_repo,
            embedding_store,
        }
    }

    /// Every individual ordered by tag.
    pub async fn execute(&self) -> Result<Vec<IndividualSummary>, DomainError> {
        let individuals = self.individual_repo.list().await?;
        let mut summaries = Vec::with_capacity(individuals.len());
        for individual in individuals {
            let embedding_count = self.embedding_store.count_for(individual.id()).await?;
            summaries.push(IndividualSummary {
                individual,
                embedding_count,
            });
        }
        Ok(summaries)
    }

    pub async fn details(&self, id_or_tag: &str) -> Result<IndividualDetails, DomainError> {
        let individual = self
            .individual_repo
            .find_by_id_or_tag(id_or_tag)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Individual not found: {}", id_or_tag)))?;

        let records = self.embedding_store.records_for(individual.id()).await?;
        let transfers = self.individual_repo.transfers_for(individual.id()).await?;
        let sample_labels = records
            .iter()
            .map(|r| {
                if r.is_primary() {
                    format!("{} (primary)", r.label())
                } else {
                    r.label().to_string()
                }
            })
            .collect();

        Ok(IndividualDetails {
            summary: IndividualSummary {
                individual,
                embedding_count: records.len() as u64,
            },
            sample_labels,
            transfers,
        })
    }
}
