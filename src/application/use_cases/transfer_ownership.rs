use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::NosePrintReader;
use crate::application::CapturedImage;
use crate::domain::{
    CallerRole, DomainError, EmbeddingStore, Individual, IndividualRepository, MatchEngine,
    MatchThresholds, Owner, OwnershipTransfer, VerificationPolicy, ALL_MATCHES,
};

/// How the animal changing hands is identified.
#[derive(Debug, Clone)]
pub enum TransferTarget {
    IdOrTag(String),
    Probe(CapturedImage),
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub individual: Individual,
    pub transfer: OwnershipTransfer,
}

pub struct TransferOwnershipUseCase {
    individual_repo: Arc<dyn IndividualRepository>,
    embedding_store: Arc<dyn EmbeddingStore>,
    reader: Arc<NosePrintReader>,
    thresholds: MatchThresholds,
}

impl TransferOwnershipUseCase {
    pub fn new(
        individual_repo: Arc<dyn IndividualRepository>,
        embedding_store: Arc<dyn EmbeddingStore>,
        reader: Arc<NosePrintReader>,
        thresholds: MatchThresholds,
    ) -> Self {
        Self {
            individual_repo,
            embedding_store,
            reader,
            thresholds,
        }
    }

    pub async fn execute(
        &self,
        target: TransferTarget,
        new_owner: Owner,
    ) -> Result<TransferReceipt, DomainError> {
        new_owner.validate()?;
        let mut individual = self.resolve(target).await?;

        if individual.owner() == &new_owner {
            return Err(DomainError::validation(format!(
                "{} is already owned by {}",
                individual.tag(),
                new_owner.full_name
            )));
        }

        let transfer = individual.transfer_to(new_owner);
        self.individual_repo
            .apply_transfer(&individual, &transfer)
            .await?;

        info!(
            "Transferred {} from {} to {}",
            individual.tag(),
            transfer.previous_owner.full_name,
            transfer.new_owner.full_name
        );

        Ok(TransferReceipt {
            individual,
            transfer,
        })
    }

    async fn resolve(&self, target: TransferTarget) -> Result<Individual, DomainError> {
        match target {
            TransferTarget::IdOrTag(key) => self
                .individual_repo
                .find_by_id_or_tag(&key)
                .await?
                .ok_or_else(|| DomainError::not_found(format!("Individual not found: {}", key))),
            TransferTarget::Probe(image) => {
                let vector = self.reader.read(&image).await?;
                let ranked = MatchEngine::new(self.embedding_store.clone())
                    .rank(vector.values(), ALL_MATCHES)
                    .await?;
                let decision = VerificationPolicy::new(self.thresholds.for_role(CallerRole::Admin))
                    .classify(&ranked);
                let id = decision.require_identified()?;

                self.individual_repo
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| DomainError::not_found(format!("Individual not found: {}", id)))
            }
        }
    }
}
