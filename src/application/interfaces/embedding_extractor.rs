use async_trait::async_trait;

use crate::domain::{DomainError, EmbeddingVector};

/// One photograph submitted for registration or verification.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub label: String,
    pub bytes: Vec<u8>,
}

impl CapturedImage {
    pub fn new(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            bytes,
        }
    }
}

/// Turns a muzzle photograph into a nose-print vector.
///
/// Implementations must not substitute fabricated vectors when the model
/// is unreachable; they fail with `ExtractionFailed` instead.
#[async_trait]
pub trait EmbeddingExtractor: Send + Sync {
    async fn extract(&self, image: &[u8]) -> Result<EmbeddingVector, DomainError>;

    fn name(&self) -> &str;
}
