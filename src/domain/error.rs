use thiserror::Error;

use super::models::MatchCandidate;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Degenerate vector: zero or non-finite norm, similarity undefined")]
    DegenerateVector,

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error(
        "Individual already registered as {tag} ({individual_id}): similarity {similarity:.3} > {threshold:.2}"
    )]
    DuplicateIndividual {
        individual_id: String,
        tag: String,
        similarity: f32,
        threshold: f32,
    },

    #[error("Ambiguous match between {} candidates (threshold {threshold:.2})", candidates.len())]
    AmbiguousMatch {
        candidates: Vec<MatchCandidate>,
        threshold: f32,
    },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::ExtractionFailed(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateIndividual { .. })
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::AmbiguousMatch { .. })
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Errors caused by the caller's input (4xx-equivalent). Duplicate and
    /// ambiguous outcomes are business results, not faults, and count here.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. }
                | Self::DegenerateVector
                | Self::DuplicateIndividual { .. }
                | Self::AmbiguousMatch { .. }
                | Self::ValidationError(_)
                | Self::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_names_tag_and_score() {
        let err = DomainError::DuplicateIndividual {
            individual_id: "abc".to_string(),
            tag: "TW-2025-ABC123".to_string(),
            similarity: 0.9712,
            threshold: 0.93,
        };

        let msg = err.to_string();
        assert!(msg.contains("TW-2025-ABC123"));
        assert!(msg.contains("0.971"));
        assert!(err.is_duplicate());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_store_errors_are_not_client_errors() {
        let err = DomainError::store("connection refused");
        assert!(err.is_store_unavailable());
        assert!(!err.is_client_error());
        assert!(!DomainError::extraction("timeout").is_client_error());
    }
}
