use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::NosePrintReader;
use crate::application::CapturedImage;
use crate::domain::{
    CallerRole, DomainError, EmbeddingStore, EmbeddingVector, Individual, IndividualRepository,
    MatchEngine, MatchThresholds, NewVerificationLog, VerificationDecision,
    VerificationLogRepository, VerificationPolicy, ALL_MATCHES,
};

/// Probes considered per verification; extra images are ignored.
pub const MAX_PROBES: usize = 2;

#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub images: Vec<CapturedImage>,
    pub role: CallerRole,
    pub location: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub decision: VerificationDecision,
    pub individual: Option<Individual>,
    pub role: CallerRole,
}

impl VerificationReport {
    pub fn ownership_notice(&self) -> Option<&'static str> {
        self.individual.as_ref().and_then(|i| i.ownership_notice())
    }
}

/// Result of verifying one live-camera frame. A frame without a visible
/// nose is an ordinary result, not a failure.
#[derive(Debug, Clone, Serialize)]
pub struct LiveVerificationReport {
    pub nose_detected: bool,
    pub detection_confidence: Option<f32>,
    pub verification: Option<VerificationReport>,
}

/// Re-identifies an animal from one or two fresh probe images. Every probe
/// is logged, whatever its outcome.
pub struct VerifyIndividualUseCase {
    embedding_store: Arc<dyn EmbeddingStore>,
    individual_repo: Arc<dyn IndividualRepository>,
    log_repo: Arc<dyn VerificationLogRepository>,
    reader: Arc<NosePrintReader>,
    thresholds: MatchThresholds,
}

impl VerifyIndividualUseCase {
    pub fn new(
        embedding_store: Arc<dyn EmbeddingStore>,
        individual_repo: Arc<dyn IndividualRepository>,
        log_repo: Arc<dyn VerificationLogRepository>,
        reader: Arc<NosePrintReader>,
        thresholds: MatchThresholds,
    ) -> Self {
        Self {
            embedding_store,
            individual_repo,
            log_repo,
            reader,
            thresholds,
        }
    }

    pub async fn execute(
        &self,
        request: VerificationRequest,
    ) -> Result<VerificationReport, DomainError> {
        let probes = select_probes(&request.images)?;

        let mut vectors = Vec::with_capacity(probes.len());
        for image in probes {
            vectors.push((image.label.as_str(), self.reader.read(image).await?));
        }

        self.verify_labelled(&vectors, request.role, &request.location)
            .await
    }

    /// Verifies already-extracted probe vectors.
    pub async fn verify_vectors(
        &self,
        vectors: &[EmbeddingVector],
        role: CallerRole,
        location: &str,
    ) -> Result<VerificationReport, DomainError> {
        let vectors = select_probes(vectors)?;
        let labels: Vec<String> = (1..=vectors.len()).map(|i| format!("probe-{}", i)).collect();
        let labelled: Vec<(&str, EmbeddingVector)> = labels
            .iter()
            .map(String::as_str)
            .zip(vectors.iter().cloned())
            .collect();

        self.verify_labelled(&labelled, role, location).await
    }

    /// Verifies a single live-camera frame under the live thresholds.
    pub async fn verify_live(
        &self,
        frame: &CapturedImage,
        location: &str,
    ) -> Result<LiveVerificationReport, DomainError> {
        let Some(read) = self.reader.read_frame(frame).await? else {
            info!("Live verification ({}): no nose detected", location);
            return Ok(LiveVerificationReport {
                nose_detected: false,
                detection_confidence: None,
                verification: None,
            });
        };

        let report = self
            .verify_labelled(
                &[(frame.label.as_str(), read.vector)],
                CallerRole::Live,
                location,
            )
            .await?;

        Ok(LiveVerificationReport {
            nose_detected: true,
            detection_confidence: read.detection_confidence,
            verification: Some(report),
        })
    }

    async fn verify_labelled(
        &self,
        probes: &[(&str, EmbeddingVector)],
        role: CallerRole,
        location: &str,
    ) -> Result<VerificationReport, DomainError> {
        for (_, vector) in probes {
            self.reader.accept(vector)?;
        }

        let engine = MatchEngine::new(self.embedding_store.clone());
        let policy = VerificationPolicy::new(self.thresholds.for_role(role));

        let mut decisions = Vec::with_capacity(probes.len());
        for (label, vector) in probes {
            let ranked = engine.rank(vector.values(), ALL_MATCHES).await?;
            let decision = policy.classify(&ranked);

            self.log_repo
                .append(NewVerificationLog::from_decision(
                    &decision, *label, role, location,
                ))
                .await?;
            decisions.push(decision);
        }

        let decision = policy.combine(decisions);
        let individual = match decision.individual_id.as_deref() {
            Some(id) => self.individual_repo.find_by_id(id).await?,
            None => None,
        };

        info!(
            "Verification ({}, {}): {} similarity {:.4}{}",
            role.as_str(),
            location,
            decision.outcome,
            decision.similarity,
            decision
                .tag
                .as_deref()
                .map(|t| format!(" -> {}", t))
                .unwrap_or_default()
        );

        Ok(VerificationReport {
            decision,
            individual,
            role,
        })
    }
}

fn select_probes<T>(probes: &[T]) -> Result<&[T], DomainError> {
    if probes.is_empty() {
        return Err(DomainError::validation("Verification needs at least one probe"));
    }
    if probes.len() > MAX_PROBES {
        warn!(
            "{} probes supplied, using the first {}",
            probes.len(),
            MAX_PROBES
        );
    }
    Ok(&probes[..probes.len().min(MAX_PROBES)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_images_are_capped() {
        let probes = ["front", "left", "right"];
        assert_eq!(select_probes(&probes).unwrap(), &["front", "left"]);
        assert_eq!(select_probes(&probes[..1]).unwrap(), &["front"]);

        let none: [&str; 0] = [];
        assert!(matches!(
            select_probes(&none),
            Err(DomainError::ValidationError(_))
        ));
    }
}
