use std::sync::Arc;

use serde::Serialize;

use crate::domain::{
    DomainError, EmbeddingStore, IndividualRepository, ReportFilter, ReportRepository,
    ReportStatus, VerificationLogRepository, VerificationOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_individuals: u64,
    pub total_embeddings: u64,
    pub total_verifications: u64,
    pub successful_verifications: u64,
    pub pending_reports: u64,
}

pub struct DashboardStatsUseCase {
    individual_repo: Arc<dyn IndividualRepository>,
    embedding_store: Arc<dyn EmbeddingStore>,
    log_repo: Arc<dyn VerificationLogRepository>,
    report_repo: Arc<dyn ReportRepository>,
}

impl DashboardStatsUseCase {
    pub fn new(
        individual_repo: Arc<dyn IndividualRepository>,
        embedding_store: Arc<dyn EmbeddingStore>,
        log_repo: Arc<dyn VerificationLogRepository>,
        report_repo: Arc<dyn ReportRepository>,
    ) -> Self {
        Self {
            individual_repo,
            embedding_store,
            log_repo,
            report_repo,
        }
    }

    pub async fn execute(&self) -> Result<DashboardStats, DomainError> {
        let pending = ReportFilter {
            status: Some(ReportStatus::Pending),
            report_type: None,
        };

        Ok(DashboardStats {
            total_individuals: self.individual_repo.count().await?,
            total_embeddings: self.embedding_store.count().await?,
            total_verifications: self.log_repo.count().await?,
            successful_verifications: self
                .log_repo
                .count_by_outcome(VerificationOutcome::Verified)
                .await?,
            pending_reports: self.report_repo.count(pending).await?,
        })
    }
}
