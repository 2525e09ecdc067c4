use async_trait::async_trait;

use crate::domain::{DomainError, NewReport, Report, ReportFilter};

/// Storage for citizen reports.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn submit(&self, report: NewReport) -> Result<Report, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Report>, DomainError>;

    /// Newest first.
    async fn list(&self, filter: ReportFilter) -> Result<Vec<Report>, DomainError>;

    /// Persists reply, status and `updated_at` of an existing report.
    async fn update(&self, report: &Report) -> Result<(), DomainError>;

    async fn count(&self, filter: ReportFilter) -> Result<u64, DomainError>;
}
