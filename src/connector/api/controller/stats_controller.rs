use anyhow::Result;

use crate::application::{DashboardStats, RegistryMode};
use crate::cli::OutputFormat;
use crate::domain::VerificationLogEntry;

use super::super::Container;
use super::format_timestamp;

pub struct StatsController<'a> {
    container: &'a Container,
}

impl<'a> StatsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn stats(&self, format: OutputFormat) -> Result<String> {
        let stats = self.container.stats_use_case().execute().await?;
        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&stats)?,
            OutputFormat::Text => self.format_stats(&stats),
        })
    }

    pub async fn logs(&self, limit: usize, format: OutputFormat) -> Result<String> {
        let entries = self.container.history_use_case().execute(Some(limit)).await?;
        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&entries)?,
            OutputFormat::Text => self.format_logs(&entries),
        })
    }

    fn format_stats(&self, stats: &DashboardStats) -> String {
        let storage = if self.container.memory_storage() {
            "memory".to_string()
        } else {
            self.container.data_dir().to_string()
        };
        let mode = match self.container.mode() {
            RegistryMode::Production => "production",
            RegistryMode::Demo => "demo (synthetic embeddings)",
        };

        format!(
            "Noseprint Registry Statistics\n=============================\nAnimals:        {}\nSamples:        {}\nVerifications:  {}\nVerified:       {}\nPending reports: {}\nStorage:        {}\nMode:           {}",
            stats.total_individuals,
            stats.total_embeddings,
            stats.total_verifications,
            stats.successful_verifications,
            stats.pending_reports,
            storage,
            mode
        )
    }

    fn format_logs(&self, entries: &[VerificationLogEntry]) -> String {
        if entries.is_empty() {
            return "No verifications recorded.".to_string();
        }
        entries
            .iter()
            .map(|e| {
                format!(
                    "{} {:<9} {:<10} {:.3} {} ({}, {})",
                    format_timestamp(e.created_at),
                    e.outcome.as_str(),
                    e.method.as_str(),
                    e.similarity,
                    e.individual_id.as_deref().unwrap_or("-"),
                    e.location,
                    e.role.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
