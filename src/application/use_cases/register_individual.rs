use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};

use super::NosePrintReader;
use crate::application::CapturedImage;
use crate::domain::{
    CattleProfile, DomainError, DuplicateGuard, EmbeddingStore, EmbeddingVector, Individual,
    IndividualRepository, NewEmbeddingRecord, Owner, TagGenerator,
};

/// Number of samples captured per registration unless configured otherwise.
pub const DEFAULT_SAMPLE_COUNT: usize = 3;

/// Capture angles in the order the operator is asked for them.
pub const REGISTRATION_ANGLES: [&str; 5] = ["front", "left", "right", "top", "front2"];

const MAX_TAG_ATTEMPTS: usize = 16;

pub fn sample_label(index: usize) -> String {
    REGISTRATION_ANGLES
        .get(index)
        .map(|angle| angle.to_string())
        .unwrap_or_else(|| format!("sample-{}", index + 1))
}

/// Serialises the duplicate check with the writes that follow it. Share one
/// instance between every registrar that writes to the same store.
#[derive(Default)]
pub struct RegistrationLock {
    inner: Mutex<()>,
}

impl RegistrationLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().await
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Tag prefix; the default prefix is used when absent.
    pub tag_prefix: Option<String>,
    pub owner: Owner,
    pub profile: CattleProfile,
    pub images: Vec<CapturedImage>,
}

/// Registers a new individual with exactly `samples` nose-print records,
/// or leaves no trace at all.
pub struct RegisterIndividualUseCase {
    individual_repo: Arc<dyn IndividualRepository>,
    embedding_store: Arc<dyn EmbeddingStore>,
    reader: Arc<NosePrintReader>,
    lock: Arc<RegistrationLock>,
    duplicate_threshold: f32,
    samples: usize,
}

impl RegisterIndividualUseCase {
    pub fn new(
        individual_repo: Arc<dyn IndividualRepository>,
        embedding_store: Arc<dyn EmbeddingStore>,
        reader: Arc<NosePrintReader>,
        lock: Arc<RegistrationLock>,
        duplicate_threshold: f32,
        samples: usize,
    ) -> Self {
        Self {
            individual_repo,
            embedding_store,
            reader,
            lock,
            duplicate_threshold,
            samples,
        }
    }

    pub async fn execute(&self, request: RegistrationRequest) -> Result<Individual, DomainError> {
        self.check_count(request.images.len())?;
        request.owner.validate()?;
        request.profile.validate()?;

        let mut vectors = Vec::with_capacity(request.images.len());
        for image in &request.images {
            vectors.push(self.reader.read(image).await?);
        }

        self.register_vectors(
            request.tag_prefix.as_deref(),
            request.owner,
            request.profile,
            vectors,
        )
        .await
    }

    /// Registers already-extracted vectors. Used directly by callers that
    /// hold embeddings rather than images.
    pub async fn register_vectors(
        &self,
        tag_prefix: Option<&str>,
        owner: Owner,
        profile: CattleProfile,
        vectors: Vec<EmbeddingVector>,
    ) -> Result<Individual, DomainError> {
        self.check_count(vectors.len())?;
        for vector in &vectors {
            self.reader.accept(vector)?;
        }
        let generator = match tag_prefix {
            Some(prefix) => TagGenerator::new(prefix)?,
            None => TagGenerator::default(),
        };

        let _guard = self.lock.acquire().await;

        DuplicateGuard::new(self.embedding_store.clone(), self.duplicate_threshold)
            .check(&vectors)
            .await?;

        let tag = self.allocate_tag(&generator).await?;
        let individual = Individual::new(tag, owner, profile);

        if let Err(e) = self.persist(&individual, vectors).await {
            warn!(
                "Registration of {} failed, rolling back: {}",
                individual.tag(),
                e
            );
            self.rollback(individual.id()).await;
            return Err(e);
        }

        info!(
            "Registered {} ({}) with {} samples",
            individual.tag(),
            individual.id(),
            self.samples
        );
        Ok(individual)
    }

    fn check_count(&self, count: usize) -> Result<(), DomainError> {
        if count != self.samples {
            return Err(DomainError::validation(format!(
                "Registration needs exactly {} images, got {}",
                self.samples, count
            )));
        }
        Ok(())
    }

    async fn allocate_tag(&self, generator: &TagGenerator) -> Result<String, DomainError> {
        for _ in 0..MAX_TAG_ATTEMPTS {
            let tag = generator.generate();
            if self.individual_repo.find_by_tag(&tag).await?.is_none() {
                return Ok(tag);
            }
        }
        Err(DomainError::internal(format!(
            "Could not allocate an unused tag with prefix {} after {} attempts",
            generator.prefix(),
            MAX_TAG_ATTEMPTS
        )))
    }

    async fn persist(
        &self,
        individual: &Individual,
        vectors: Vec<EmbeddingVector>,
    ) -> Result<(), DomainError> {
        self.individual_repo.save(individual).await?;

        for (index, vector) in vectors.into_iter().enumerate() {
            let record =
                NewEmbeddingRecord::new(individual.id(), vector.into_values(), sample_label(index))
                    .primary(index == 0);
            self.embedding_store.insert(record).await?;
        }
        Ok(())
    }

    async fn rollback(&self, individual_id: &str) {
        if let Err(e) = self.embedding_store.delete_individual(individual_id).await {
            error!("Rollback could not remove samples of {}: {}", individual_id, e);
        }
        if let Err(e) = self.individual_repo.delete(individual_id).await {
            error!("Rollback could not remove individual {}: {}", individual_id, e);
        }
    }
}
