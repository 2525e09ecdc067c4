use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, NewReport, Report, ReportFilter, ReportRepository, ReportStatus};

/// Citizen reports: submission, status lookup, listing and admin replies.
pub struct ReportsUseCase {
    report_repo: Arc<dyn ReportRepository>,
}

impl ReportsUseCase {
    pub fn new(report_repo: Arc<dyn ReportRepository>) -> Self {
        Self { report_repo }
    }

    pub async fn submit(&self, mut report: NewReport) -> Result<Report, DomainError> {
        report.validate()?;
        report.tag = report.tag.map(|t| t.trim().to_uppercase());

        let report = self.report_repo.submit(report).await?;
        info!(
            "Report {} submitted ({}, tag {})",
            report.id,
            report.report_type.as_str(),
            report.tag.as_deref().unwrap_or("-")
        );
        Ok(report)
    }

    pub async fn status(&self, id: i64) -> Result<Report, DomainError> {
        self.report_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Report not found: {}", id)))
    }

    pub async fn list(&self, filter: ReportFilter) -> Result<Vec<Report>, DomainError> {
        self.report_repo.list(filter).await
    }

    pub async fn reply(
        &self,
        id: i64,
        reply: &str,
        status: ReportStatus,
    ) -> Result<Report, DomainError> {
        if reply.trim().is_empty() {
            return Err(DomainError::validation("Reply text is required"));
        }
        let mut report = self.status(id).await?;
        report.apply_reply(reply.trim().to_string(), status);
        self.report_repo.update(&report).await?;

        info!("Report {} answered, status {}", id, status.as_str());
        Ok(report)
    }
}
