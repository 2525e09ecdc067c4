use anyhow::Result;

use crate::cli::OutputFormat;
use crate::domain::{NewReport, Report, ReportFilter, ReportStatus, ReportType};

use super::super::Container;
use super::format_timestamp;

pub struct ReportController<'a> {
    container: &'a Container,
}

impl<'a> ReportController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn submit(
        &self,
        name: String,
        phone: Option<String>,
        email: Option<String>,
        tag: Option<String>,
        report_type: String,
        subject: String,
        message: String,
        location: Option<String>,
    ) -> Result<String> {
        let report = NewReport {
            reporter_name: name,
            reporter_phone: phone,
            reporter_email: email,
            tag,
            report_type: ReportType::parse(&report_type)?,
            subject,
            message,
            location,
        };

        let report = self.container.reports_use_case().submit(report).await?;
        Ok(format!(
            "Report {} submitted, status {}.",
            report.id,
            report.status.as_str()
        ))
    }

    pub async fn status(&self, id: i64, format: OutputFormat) -> Result<String> {
        let report = self.container.reports_use_case().status(id).await?;
        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&report)?,
            OutputFormat::Text => self.format_report(&report),
        })
    }

    pub async fn list(
        &self,
        status: Option<String>,
        report_type: Option<String>,
        format: OutputFormat,
    ) -> Result<String> {
        let filter = ReportFilter {
            status: status.as_deref().map(ReportStatus::parse).transpose()?,
            report_type: report_type.as_deref().map(ReportType::parse).transpose()?,
        };
        let reports = self.container.reports_use_case().list(filter).await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&reports)?,
            OutputFormat::Text if reports.is_empty() => "No reports found.".to_string(),
            OutputFormat::Text => reports
                .iter()
                .map(|r| {
                    format!(
                        "#{} [{}] {} - {} ({})",
                        r.id,
                        r.status.as_str(),
                        r.report_type.as_str(),
                        r.subject,
                        format_timestamp(r.created_at)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        })
    }

    pub async fn reply(&self, id: i64, reply: String, status: String) -> Result<String> {
        let status = ReportStatus::parse(&status)?;
        let report = self
            .container
            .reports_use_case()
            .reply(id, &reply, status)
            .await?;
        Ok(format!(
            "Report {} updated, status {}.",
            report.id,
            report.status.as_str()
        ))
    }

    fn format_report(&self, report: &Report) -> String {
        let mut out = format!(
            "Report #{} ({})\n  Status:   {}\n  From:     {}\n  Subject:  {}\n  Message:  {}\n",
            report.id,
            report.report_type.as_str(),
            report.status.as_str(),
            report.reporter_name,
            report.subject,
            report.message
        );
        if let Some(tag) = &report.tag {
            out.push_str(&format!("  Tag:      {}\n", tag));
        }
        if let Some(location) = &report.location {
            out.push_str(&format!("  Location: {}\n", location));
        }
        if let Some(reply) = &report.admin_reply {
            out.push_str(&format!("  Reply:    {}\n", reply));
        }
        out.push_str(&format!("  Updated:  {}", format_timestamp(report.updated_at)));
        out
    }
}
