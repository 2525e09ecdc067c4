use std::path::PathBuf;

use anyhow::Result;

use crate::application::{
    LiveVerificationReport, TagVerification, VerificationReport, VerificationRequest,
};
use crate::cli::OutputFormat;
use crate::domain::{CallerRole, VerificationOutcome};

use super::super::Container;
use super::{load_image, load_images};

pub struct VerifyController<'a> {
    container: &'a Container,
}

impl<'a> VerifyController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn verify(
        &self,
        images: Vec<PathBuf>,
        role: String,
        location: String,
        format: OutputFormat,
    ) -> Result<String> {
        let request = VerificationRequest {
            images: load_images(&images).await?,
            role: CallerRole::parse(&role)?,
            location,
        };

        let report = self.container.verify_use_case().execute(request).await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&report)?,
            OutputFormat::Text => self.format_report(&report),
        })
    }

    pub async fn verify_live(
        &self,
        frame: PathBuf,
        location: String,
        format: OutputFormat,
    ) -> Result<String> {
        let frame = load_image(&frame).await?;
        let report = self
            .container
            .verify_use_case()
            .verify_live(&frame, &location)
            .await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&report)?,
            OutputFormat::Text => self.format_live_report(&report),
        })
    }

    pub async fn verify_tag(
        &self,
        tag: String,
        role: String,
        location: String,
        format: OutputFormat,
    ) -> Result<String> {
        let role = CallerRole::parse(&role)?;
        let result = self
            .container
            .verify_tag_use_case()
            .execute(&tag, role, &location)
            .await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&result)?,
            OutputFormat::Text => self.format_tag_verification(&result),
        })
    }

    fn format_report(&self, report: &VerificationReport) -> String {
        let decision = &report.decision;
        let mut out = match decision.outcome {
            VerificationOutcome::NotFound => format!(
                "NOT FOUND: no registered animal above {:.2} (best similarity {:.3})\n",
                decision.threshold, decision.similarity
            ),
            VerificationOutcome::Ambiguous => {
                let mut s = format!(
                    "AMBIGUOUS: {} animals match above {:.2}; capture a clearer photo\n",
                    decision.candidates.len(),
                    decision.threshold
                );
                for candidate in &decision.candidates {
                    s.push_str(&format!(
                        "  {} (similarity: {:.3})\n",
                        candidate.tag, candidate.similarity
                    ));
                }
                s
            }
            VerificationOutcome::Partial | VerificationOutcome::Verified => format!(
                "{}: {} (similarity: {:.3}, strict threshold {:.2})\n",
                decision.outcome.as_str().to_uppercase(),
                decision.tag.as_deref().unwrap_or("-"),
                decision.similarity,
                decision.threshold
            ),
        };

        if let Some(individual) = &report.individual {
            out.push_str(&format!("  {}\n", individual.summary()));
        }
        if let Some(notice) = report.ownership_notice() {
            out.push_str(&format!("  {}\n", notice));
        }
        out.trim_end().to_string()
    }

    fn format_live_report(&self, report: &LiveVerificationReport) -> String {
        match &report.verification {
            None => "NO NOSE DETECTED: position the muzzle in the camera view".to_string(),
            Some(verification) => {
                let mut out = self.format_report(verification);
                if let Some(confidence) = report.detection_confidence {
                    out.push_str(&format!("\n  Detection confidence: {:.2}", confidence));
                }
                out
            }
        }
    }

    fn format_tag_verification(&self, result: &TagVerification) -> String {
        let mut out = format!(
            "VERIFIED by tag: {}\n  Status: {}",
            result.individual.summary(),
            result.individual.status().as_str()
        );
        if let Some(notice) = result.ownership_notice() {
            out.push_str(&format!("\n  {}", notice));
        }
        out
    }
}
