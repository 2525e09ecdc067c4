use serde::{Deserialize, Serialize};

use super::current_timestamp;
use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Suspect,
    Theft,
    Other,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Suspect => "suspect",
            ReportType::Theft => "theft",
            ReportType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.to_lowercase().as_str() {
            "suspect" => Ok(ReportType::Suspect),
            "theft" => Ok(ReportType::Theft),
            "other" => Ok(ReportType::Other),
            other => Err(DomainError::validation(format!(
                "Unknown report type '{}', expected suspect, theft or other",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pending,
    Resolved,
    Closed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ReportStatus::Pending),
            "resolved" => Ok(ReportStatus::Resolved),
            "closed" => Ok(ReportStatus::Closed),
            other => Err(DomainError::validation(format!(
                "Unknown report status '{}', expected pending, resolved or closed",
                other
            ))),
        }
    }
}

/// Citizen-submitted report about a suspicious or stolen animal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub reporter_name: String,
    pub reporter_phone: Option<String>,
    pub reporter_email: Option<String>,
    pub tag: Option<String>,
    pub report_type: ReportType,
    pub subject: String,
    pub message: String,
    pub location: Option<String>,
    pub status: ReportStatus,
    pub admin_reply: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Report {
    pub fn is_pending(&self) -> bool {
        self.status == ReportStatus::Pending
    }

    pub fn apply_reply(&mut self, reply: String, status: ReportStatus) {
        self.admin_reply = Some(reply);
        self.status = status;
        self.updated_at = current_timestamp();
    }
}

/// A report as submitted, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub reporter_name: String,
    pub reporter_phone: Option<String>,
    pub reporter_email: Option<String>,
    pub tag: Option<String>,
    pub report_type: ReportType,
    pub subject: String,
    pub message: String,
    pub location: Option<String>,
}

impl NewReport {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.reporter_name.trim().is_empty() {
            return Err(DomainError::validation("Reporter name is required"));
        }
        if self.subject.trim().is_empty() || self.message.trim().is_empty() {
            return Err(DomainError::validation("Report subject and message are required"));
        }
        Ok(())
    }

    pub fn into_report(self, id: i64) -> Report {
        let now = current_timestamp();
        Report {
            id,
            reporter_name: self.reporter_name,
            reporter_phone: self.reporter_phone,
            reporter_email: self.reporter_email,
            tag: self.tag,
            report_type: self.report_type,
            subject: self.subject,
            message: self.message,
            location: self.location,
            status: ReportStatus::Pending,
            admin_reply: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Optional filters for listing reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub report_type: Option<ReportType>,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        self.status.map_or(true, |s| s == report.status)
            && self.report_type.map_or(true, |t| t == report.report_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewReport {
        NewReport {
            reporter_name: "Nyandeng".to_string(),
            reporter_phone: Some("+211911111111".to_string()),
            reporter_email: None,
            tag: Some("TW-2025-QWERTY".to_string()),
            report_type: ReportType::Theft,
            subject: "Missing cow".to_string(),
            message: "Taken from the kraal last night".to_string(),
            location: Some("Rumbek".to_string()),
        }
    }

    #[test]
    fn test_new_report_starts_pending() {
        let report = draft().into_report(7);
        assert_eq!(report.id, 7);
        assert!(report.is_pending());
        assert!(report.admin_reply.is_none());
    }

    #[test]
    fn test_reply_updates_status() {
        let mut report = draft().into_report(1);
        report.apply_reply("Recovered".to_string(), ReportStatus::Resolved);
        assert_eq!(report.status, ReportStatus::Resolved);
        assert_eq!(report.admin_reply.as_deref(), Some("Recovered"));
    }

    #[test]
    fn test_filter_by_status_and_type() {
        let report = draft().into_report(1);
        let theft = ReportFilter {
            status: None,
            report_type: Some(ReportType::Theft),
        };
        let closed = ReportFilter {
            status: Some(ReportStatus::Closed),
            report_type: None,
        };
        assert!(theft.matches(&report));
        assert!(!closed.matches(&report));
        assert!(ReportFilter::default().matches(&report));
    }

    #[test]
    fn test_validation_requires_subject() {
        let mut report = draft();
        report.subject = String::new();
        assert!(report.validate().is_err());
    }
}
