use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Muzzle location reported by a detector, `[x1, y1, x2, y2]` in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoseRegion {
    pub bbox: [f32; 4],
    pub confidence: f32,
    /// Encoded image of the muzzle alone, when the detector returns one.
    /// The extractor is fed this crop instead of the full photo.
    #[serde(skip)]
    pub crop: Option<Vec<u8>>,
}

/// Optional pre-filter run before extraction. `Ok(None)` means no nose was
/// found in the image.
#[async_trait]
pub trait NoseDetector: Send + Sync {
    async fn detect(&self, image: &[u8]) -> Result<Option<NoseRegion>, DomainError>;
}
