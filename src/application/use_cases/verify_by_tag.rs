use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::{
    CallerRole, DomainError, Individual, IndividualRepository, NewVerificationLog,
    VerificationLogEntry, VerificationLogRepository,
};

#[derive(Debug, Clone, Serialize)]
pub struct TagVerification {
    pub individual: Individual,
    pub log: VerificationLogEntry,
}

impl TagVerification {
    pub fn ownership_notice(&self) -> Option<&'static str> {
        self.individual.ownership_notice()
    }
}

/// Looks an animal up by its printed tag instead of a nose print.
pub struct VerifyByTagUseCase {
    individual_repo: Arc<dyn IndividualRepository>,
    log_repo: Arc<dyn VerificationLogRepository>,
}

impl VerifyByTagUseCase {
    pub fn new(
        individual_repo: Arc<dyn IndividualRepository>,
        log_repo: Arc<dyn VerificationLogRepository>,
    ) -> Self {
        Self {
            individual_repo,
            log_repo,
        }
    }

    pub async fn execute(
        &self,
        tag: &str,
        role: CallerRole,
        location: &str,
    ) -> Result<TagVerification, DomainError> {
        let tag = tag.trim().to_uppercase();
        let individual = self
            .individual_repo
            .find_by_tag(&tag)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("No individual with tag {}", tag)))?;

        let log = self
            .log_repo
            .append(NewVerificationLog::by_tag(individual.id(), role, location))
            .await?;

        info!("Tag verification for {} at {}", individual.tag(), location);

        Ok(TagVerification { individual, log })
    }
}
