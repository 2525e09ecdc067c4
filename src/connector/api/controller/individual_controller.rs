use anyhow::Result;

use crate::application::IndividualDetails;
use crate::cli::OutputFormat;
use crate::domain::IndividualSummary;

use super::super::Container;
use super::{format_timestamp, format_transfer};

pub struct IndividualController<'a> {
    container: &'a Container,
}

impl<'a> IndividualController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn list(&self, format: OutputFormat) -> Result<String> {
        let summaries = self.container.list_use_case().execute().await?;
        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&summaries)?,
            OutputFormat::Text => self.format_list(&summaries),
        })
    }

    pub async fn show(&self, id_or_tag: String, format: OutputFormat) -> Result<String> {
        let details = self.container.list_use_case().details(&id_or_tag).await?;
        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&details)?,
            OutputFormat::Text => self.format_details(&details),
        })
    }

    pub async fn delete(&self, id_or_tag: String) -> Result<String> {
        let individual = self.container.delete_use_case().execute(&id_or_tag).await?;
        Ok(format!("Deleted {} ({}).", individual.tag(), individual.id()))
    }

    fn format_list(&self, summaries: &[IndividualSummary]) -> String {
        if summaries.is_empty() {
            return "No animals registered.".to_string();
        }

        let mut out = format!("Registered animals ({}):\n\n", summaries.len());
        for summary in summaries {
            let individual = &summary.individual;
            out.push_str(&format!("  {} ({})\n", individual.tag(), individual.id()));
            out.push_str(&format!(
                "    Owner: {}, Status: {}, Samples: {}\n",
                individual.owner().full_name,
                individual.status().as_str(),
                summary.embedding_count
            ));
        }
        out.trim_end().to_string()
    }

    fn format_details(&self, details: &IndividualDetails) -> String {
        let individual = &details.summary.individual;
        let owner = individual.owner();
        let mut out = format!(
            "{}\n  Id:         {}\n  Status:     {}\n  Registered: {}\n  Owner:      {}\n",
            individual.summary(),
            individual.id(),
            individual.status().as_str(),
            format_timestamp(individual.created_at()),
            owner.full_name
        );
        if let Some(phone) = &owner.phone {
            out.push_str(&format!("  Phone:      {}\n", phone));
        }
        out.push_str(&format!(
            "  Samples:    {}\n",
            details.sample_labels.join(", ")
        ));
        if !details.transfers.is_empty() {
            out.push_str("  Transfers:\n");
            for transfer in &details.transfers {
                out.push_str(&format!("    {}\n", format_transfer(transfer)));
            }
        }
        out.trim_end().to_string()
    }
}
