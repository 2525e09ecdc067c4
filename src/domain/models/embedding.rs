use serde::{Deserialize, Serialize};

use super::current_timestamp;
use crate::domain::DomainError;

/// Length of every nose-print embedding in the registry.
pub const EMBEDDING_DIMENSIONS: usize = 256;

/// Default quality score recorded for a registration sample.
pub const DEFAULT_SAMPLE_QUALITY: f32 = 0.8;

/// Where a vector came from. Only biometric vectors may reach production
/// matching; synthetic ones are produced by the demo extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProvenance {
    Biometric,
    Synthetic,
}

impl EmbeddingProvenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingProvenance::Biometric => "biometric",
            EmbeddingProvenance::Synthetic => "synthetic",
        }
    }
}

/// A validated probe or sample vector: correct length, finite, non-zero norm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector {
    values: Vec<f32>,
    provenance: EmbeddingProvenance,
}

impl EmbeddingVector {
    pub fn new(values: Vec<f32>) -> Result<Self, DomainError> {
        Self::with_provenance(values, EmbeddingProvenance::Biometric)
    }

    pub fn synthetic(values: Vec<f32>) -> Result<Self, DomainError> {
        Self::with_provenance(values, EmbeddingProvenance::Synthetic)
    }

    fn with_provenance(
        values: Vec<f32>,
        provenance: EmbeddingProvenance,
    ) -> Result<Self, DomainError> {
        validate_vector(&values)?;
        Ok(Self { values, provenance })
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn provenance(&self) -> EmbeddingProvenance {
        self.provenance
    }

    pub fn is_synthetic(&self) -> bool {
        self.provenance == EmbeddingProvenance::Synthetic
    }

    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

/// Checks length and norm; returns the L2 norm on success.
pub fn validate_vector(values: &[f32]) -> Result<f64, DomainError> {
    if values.len() != EMBEDDING_DIMENSIONS {
        return Err(DomainError::DimensionMismatch {
            expected: EMBEDDING_DIMENSIONS,
            actual: values.len(),
        });
    }

    let norm = l2_norm(values);
    if norm == 0.0 || !norm.is_finite() {
        return Err(DomainError::DegenerateVector);
    }

    Ok(norm)
}

pub fn l2_norm(values: &[f32]) -> f64 {
    values
        .iter()
        .map(|&v| (v as f64) * (v as f64))
        .sum::<f64>()
        .sqrt()
}

/// One stored biometric sample. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    id: i64,
    individual_id: String,
    vector: Vec<f32>,
    label: String,
    quality: f32,
    is_primary: bool,
    created_at: i64,
}

impl EmbeddingRecord {
    /// Reconstitutes from persisted data (used by adapters).
    pub fn reconstitute(
        id: i64,
        individual_id: String,
        vector: Vec<f32>,
        label: String,
        quality: f32,
        is_primary: bool,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            individual_id,
            vector,
            label,
            quality,
            is_primary,
            created_at,
        }
    }

    pub fn from_new(id: i64, record: NewEmbeddingRecord) -> Self {
        Self {
            id,
            individual_id: record.individual_id,
            vector: record.vector,
            label: record.label,
            quality: record.quality,
            is_primary: record.is_primary,
            created_at: current_timestamp(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn individual_id(&self) -> &str {
        &self.individual_id
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}

/// Insert request for the embedding store. The vector is unchecked here;
/// stores validate it at write time.
#[derive(Debug, Clone)]
pub struct NewEmbeddingRecord {
    individual_id: String,
    vector: Vec<f32>,
    label: String,
    quality: f32,
    is_primary: bool,
}

impl NewEmbeddingRecord {
    pub fn new(individual_id: impl Into<String>, vector: Vec<f32>, label: impl Into<String>) -> Self {
        Self {
            individual_id: individual_id.into(),
            vector,
            label: label.into(),
            quality: DEFAULT_SAMPLE_QUALITY,
            is_primary: false,
        }
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    pub fn primary(mut self, is_primary: bool) -> Self {
        self.is_primary = is_primary;
        self
    }

    pub fn individual_id(&self) -> &str {
        &self.individual_id
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Write-time checks shared by every store implementation.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_vector(&self.vector)?;
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(DomainError::validation(format!(
                "Quality score must be within [0, 1], got {}",
                self.quality
            )));
        }
        if self.individual_id.trim().is_empty() {
            return Err(DomainError::validation("Embedding record needs an individual id"));
        }
        Ok(())
    }
}
