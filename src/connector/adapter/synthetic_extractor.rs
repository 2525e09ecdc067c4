use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::application::EmbeddingExtractor;
use crate::domain::{DomainError, EmbeddingVector, EMBEDDING_DIMENSIONS};

/// Demo-only extractor: derives a repeatable unit vector from the image
/// bytes. Its vectors carry `Synthetic` provenance and are refused by the
/// registry unless it runs in demo mode.
pub struct SyntheticExtractor;

impl SyntheticExtractor {
    pub fn new() -> Self {
        Self
    }

    fn generate(image: &[u8]) -> Vec<f32> {
        let digest = Sha256::digest(image);
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest);

        let mut rng = StdRng::from_seed(seed);
        let mut vector: Vec<f32> = (0..EMBEDDING_DIMENSIONS)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for x in &mut vector {
                *x /= magnitude;
            }
        }
        vector
    }
}

impl Default for SyntheticExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingExtractor for SyntheticExtractor {
    async fn extract(&self, image: &[u8]) -> Result<EmbeddingVector, DomainError> {
        if image.is_empty() {
            return Err(DomainError::extraction("Empty image"));
        }
        debug!("Generating synthetic vector for {} bytes", image.len());
        EmbeddingVector::synthetic(Self::generate(image))
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
