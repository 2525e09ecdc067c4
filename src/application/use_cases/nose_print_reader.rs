use std::sync::Arc;

use tracing::debug;

use crate::application::{CapturedImage, EmbeddingExtractor, NoseDetector};
use crate::domain::{DomainError, EmbeddingVector};

/// Whether labelled synthetic vectors may reach the matching core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistryMode {
    #[default]
    Production,
    Demo,
}

/// A vector read from one image, with the detector's confidence when a
/// detector ran.
#[derive(Debug, Clone)]
pub struct NosePrintFrame {
    pub vector: EmbeddingVector,
    pub detection_confidence: Option<f32>,
}

/// Detector plus extractor, with the provenance gate applied to every
/// vector before it is matched or stored.
pub struct NosePrintReader {
    extractor: Arc<dyn EmbeddingExtractor>,
    detector: Option<Arc<dyn NoseDetector>>,
    mode: RegistryMode,
}

impl NosePrintReader {
    pub fn new(extractor: Arc<dyn EmbeddingExtractor>, mode: RegistryMode) -> Self {
        Self {
            extractor,
            detector: None,
            mode,
        }
    }

    pub fn with_detector(mut self, detector: Arc<dyn NoseDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn mode(&self) -> RegistryMode {
        self.mode
    }

    pub async fn read(&self, image: &CapturedImage) -> Result<EmbeddingVector, DomainError> {
        self.read_frame(image)
            .await?
            .map(|frame| frame.vector)
            .ok_or_else(|| {
                DomainError::extraction(format!("No nose detected in image '{}'", image.label))
            })
    }

    /// Like [`read`](Self::read), but a frame without a detectable nose is
    /// `Ok(None)` rather than an error.
    pub async fn read_frame(
        &self,
        image: &CapturedImage,
    ) -> Result<Option<NosePrintFrame>, DomainError> {
        if image.bytes.is_empty() {
            return Err(DomainError::validation(format!(
                "Image '{}' is empty",
                image.label
            )));
        }

        let region = match &self.detector {
            Some(detector) => match detector.detect(&image.bytes).await? {
                Some(region) => {
                    debug!(
                        "Nose detected in '{}' (confidence {:.2})",
                        image.label, region.confidence
                    );
                    Some(region)
                }
                None => {
                    debug!("No nose detected in '{}'", image.label);
                    return Ok(None);
                }
            },
            None => None,
        };

        let pixels = region
            .as_ref()
            .and_then(|r| r.crop.as_deref())
            .unwrap_or(image.bytes.as_slice());
        let vector = self.extractor.extract(pixels).await?;
        self.accept(&vector)?;
        debug!(
            "Extracted {}-d vector from '{}' via {}",
            vector.dimensions(),
            image.label,
            self.extractor.name()
        );

        Ok(Some(NosePrintFrame {
            vector,
            detection_confidence: region.map(|r| r.confidence),
        }))
    }

    /// Rejects synthetic vectors outside demo mode.
    pub fn accept(&self, vector: &EmbeddingVector) -> Result<(), DomainError> {
        if vector.is_synthetic() && self.mode != RegistryMode::Demo {
            return Err(DomainError::extraction(
                "Synthetic vector rejected: non-biometric data is only accepted in demo mode",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::application::NoseRegion;
    use crate::domain::EMBEDDING_DIMENSIONS;

    /// Records the bytes it was asked to embed.
    #[derive(Default)]
    struct RecordingExtractor {
        seen: Mutex<Vec<Vec<u8>>>,
    }

    #[async_trait]
    impl EmbeddingExtractor for RecordingExtractor {
        async fn extract(&self, image: &[u8]) -> Result<EmbeddingVector, DomainError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(image.to_vec());
            }
            let mut values = vec![0.0; EMBEDDING_DIMENSIONS];
            values[0] = 1.0;
            EmbeddingVector::new(values)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct FixedDetector(Option<NoseRegion>);

    #[async_trait]
    impl NoseDetector for FixedDetector {
        async fn detect(&self, _image: &[u8]) -> Result<Option<NoseRegion>, DomainError> {
            Ok(self.0.clone())
        }
    }

    fn photo() -> CapturedImage {
        CapturedImage::new("frame-1", b"full camera frame".to_vec())
    }

    #[tokio::test]
    async fn test_frame_without_nose_is_not_an_error() {
        let extractor = Arc::new(RecordingExtractor::default());
        let reader = NosePrintReader::new(extractor.clone(), RegistryMode::Production)
            .with_detector(Arc::new(FixedDetector(None)));

        assert!(reader.read_frame(&photo()).await.unwrap().is_none());
        assert!(matches!(
            reader.read(&photo()).await,
            Err(DomainError::ExtractionFailed(_))
        ));
        assert!(extractor.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detector_crop_is_embedded_instead_of_full_image() {
        let extractor = Arc::new(RecordingExtractor::default());
        let region = NoseRegion {
            bbox: [10.0, 20.0, 110.0, 120.0],
            confidence: 0.93,
            crop: Some(b"muzzle only".to_vec()),
        };
        let reader = NosePrintReader::new(extractor.clone(), RegistryMode::Production)
            .with_detector(Arc::new(FixedDetector(Some(region))));

        let frame = reader.read_frame(&photo()).await.unwrap().unwrap();
        assert_eq!(frame.detection_confidence, Some(0.93));
        assert_eq!(
            extractor.seen.lock().unwrap().as_slice(),
            &[b"muzzle only".to_vec()]
        );
    }

    #[tokio::test]
    async fn test_without_detector_full_image_is_embedded() {
        let extractor = Arc::new(RecordingExtractor::default());
        let reader = NosePrintReader::new(extractor.clone(), RegistryMode::Production);

        let frame = reader.read_frame(&photo()).await.unwrap().unwrap();
        assert!(frame.detection_confidence.is_none());
        assert_eq!(
            extractor.seen.lock().unwrap().as_slice(),
            &[b"full camera frame".to_vec()]
        );
    }
}
