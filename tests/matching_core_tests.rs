//! Behavioural tests for the matching core: ranking, duplicate guard,
//! verification policy and the registrar's all-or-nothing writes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use noseprint::domain::{
    cosine_similarity, EmbeddingRecord, MatchResult, NewEmbeddingRecord, EMBEDDING_DIMENSIONS,
};
use noseprint::application::NoseRegion;
use noseprint::{
    CallerRole, CapturedImage, CattleProfile, DomainError, EmbeddingExtractor, EmbeddingStore,
    EmbeddingVector, InMemoryRegistry, IndividualRepository, MatchEngine, MatchThresholds,
    NoseDetector, NosePrintReader, Owner, RegisterIndividualUseCase, RegistrationLock,
    RegistryMode, VerificationLogRepository, VerificationOutcome, VerifyIndividualUseCase,
};

fn axis(hot: usize) -> Vec<f32> {
    let mut v = vec![0.0; EMBEDDING_DIMENSIONS];
    v[hot] = 1.0;
    v
}

/// `a * e0 + sqrt(1 - a^2) * e_k`: cosine `a` against `e0`, and `a * b`
/// against another blend on a different axis.
fn blend(a: f32, k: usize) -> Vec<f32> {
    let mut v = vec![0.0; EMBEDDING_DIMENSIONS];
    v[0] = a;
    v[k] = (1.0 - a * a).sqrt();
    v
}

fn vector(values: Vec<f32>) -> EmbeddingVector {
    EmbeddingVector::new(values).expect("valid vector")
}

/// Extractor double that is never reached by vector-level calls.
struct UnusedExtractor;

#[async_trait]
impl EmbeddingExtractor for UnusedExtractor {
    async fn extract(&self, _image: &[u8]) -> Result<EmbeddingVector, DomainError> {
        Err(DomainError::extraction("no model in tests"))
    }

    fn name(&self) -> &str {
        "unused"
    }
}

fn reader() -> Arc<NosePrintReader> {
    Arc::new(NosePrintReader::new(
        Arc::new(UnusedExtractor),
        RegistryMode::Production,
    ))
}

fn owner() -> Owner {
    Owner::new("Deng Majok").with_phone("+211912345678")
}

fn profile() -> CattleProfile {
    CattleProfile::new("Nuer Zebu", "white", 5)
}

struct Registry {
    store: Arc<InMemoryRegistry>,
    lock: Arc<RegistrationLock>,
}

impl Registry {
    fn new() -> Self {
        Self {
            store: Arc::new(InMemoryRegistry::new()),
            lock: Arc::new(RegistrationLock::new()),
        }
    }

    fn registrar(&self, duplicate_threshold: f32, samples: usize) -> RegisterIndividualUseCase {
        RegisterIndividualUseCase::new(
            self.store.clone(),
            self.store.clone(),
            reader(),
            self.lock.clone(),
            duplicate_threshold,
            samples,
        )
    }

    fn verifier(&self) -> VerifyIndividualUseCase {
        VerifyIndividualUseCase::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            reader(),
            MatchThresholds::default(),
        )
    }

    async fn register_one(&self, values: Vec<f32>) -> Result<String, DomainError> {
        self.registrar(0.93, 1)
            .register_vectors(None, owner(), profile(), vec![vector(values)])
            .await
            .map(|individual| individual.id().to_string())
    }

    async fn individual_count(&self) -> u64 {
        IndividualRepository::count(self.store.as_ref())
            .await
            .expect("count")
    }

    async fn embedding_count(&self) -> u64 {
        EmbeddingStore::count(self.store.as_ref())
            .await
            .expect("count")
    }
}

#[test]
fn test_cosine_is_symmetric_and_self_similar() {
    let a = blend(0.6, 3);
    let b = blend(0.8, 7);

    let ab = cosine_similarity(&a, &b).unwrap();
    let ba = cosine_similarity(&b, &a).unwrap();
    assert_eq!(ab, ba);
    assert!((ab - 0.48).abs() < 1e-5);

    let aa = cosine_similarity(&a, &a).unwrap();
    assert!((aa - 1.0).abs() < 1e-5);
}

#[test]
fn test_malformed_vectors_are_rejected() {
    match EmbeddingVector::new(vec![0.1; 255]) {
        Err(DomainError::DimensionMismatch { expected, actual }) => {
            assert_eq!(expected, 256);
            assert_eq!(actual, 255);
        }
        other => panic!("expected dimension mismatch, got {:?}", other),
    }

    assert!(matches!(
        EmbeddingVector::new(vec![0.0; EMBEDDING_DIMENSIONS]),
        Err(DomainError::DegenerateVector)
    ));
    assert!(matches!(
        cosine_similarity(&axis(0), &vec![0.0; EMBEDDING_DIMENSIONS]),
        Err(DomainError::DegenerateVector)
    ));
}

#[tokio::test]
async fn test_engine_rejects_wrong_length_query() {
    let registry = Registry::new();
    registry.register_one(axis(1)).await.unwrap();

    let engine = MatchEngine::new(registry.store.clone());
    let result = engine.rank(&[0.5; 255], 5).await;
    assert!(matches!(
        result,
        Err(DomainError::DimensionMismatch { actual: 255, .. })
    ));
}

#[tokio::test]
async fn test_empty_store_is_not_found() {
    let registry = Registry::new();
    let report = registry
        .verifier()
        .verify_vectors(&[vector(axis(0))], CallerRole::Mobile, "Bor")
        .await
        .unwrap();

    assert_eq!(report.decision.outcome, VerificationOutcome::NotFound);
    assert_eq!(report.decision.similarity, 0.0);
    assert!(report.decision.candidates.is_empty());
    assert!(report.individual.is_none());

    let logs = VerificationLogRepository::list(registry.store.as_ref(), None)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].individual_id.is_none());
}

#[tokio::test]
async fn test_registered_sample_verifies_itself() {
    let registry = Registry::new();
    let id = registry.register_one(blend(0.3, 9)).await.unwrap();

    let report = registry
        .verifier()
        .verify_vectors(&[vector(blend(0.3, 9))], CallerRole::Mobile, "Bor")
        .await
        .unwrap();

    assert_eq!(report.decision.outcome, VerificationOutcome::Verified);
    assert_eq!(report.decision.individual_id.as_deref(), Some(id.as_str()));
    assert!((report.decision.similarity - 1.0).abs() < 1e-5);
    assert!(report.ownership_notice().is_none());
}

#[tokio::test]
async fn test_verification_is_deterministic() {
    let registry = Registry::new();
    registry.register_one(blend(0.9, 1)).await.unwrap();
    registry.register_one(blend(0.2, 2)).await.unwrap();

    let verifier = registry.verifier();
    let probe = [vector(axis(0))];
    let first = verifier
        .verify_vectors(&probe, CallerRole::Mobile, "Yirol")
        .await
        .unwrap();
    let second = verifier
        .verify_vectors(&probe, CallerRole::Mobile, "Yirol")
        .await
        .unwrap();

    assert_eq!(first.decision, second.decision);

    let engine = MatchEngine::new(registry.store.clone());
    let ranked_a: Vec<MatchResult> = engine.rank(&axis(0), 10).await.unwrap();
    let ranked_b: Vec<MatchResult> = engine.rank(&axis(0), 10).await.unwrap();
    assert_eq!(ranked_a, ranked_b);
}

#[tokio::test]
async fn test_identical_sample_is_duplicate_and_half_similar_is_not() {
    let registry = Registry::new();
    let first = registry.register_one(axis(0)).await.unwrap();

    match registry.register_one(axis(0)).await {
        Err(DomainError::DuplicateIndividual {
            individual_id,
            similarity,
            ..
        }) => {
            assert_eq!(individual_id, first);
            assert!((similarity - 1.0).abs() < 1e-5);
        }
        other => panic!("expected duplicate, got {:?}", other),
    }

    registry.register_one(blend(0.5, 1)).await.unwrap();
    assert_eq!(registry.individual_count().await, 2);
}

#[tokio::test]
async fn test_duplicate_threshold_boundary() {
    let registry = Registry::new();
    let registrar = registry.registrar(0.5, 1);

    registrar
        .register_vectors(None, owner(), profile(), vec![vector(blend(0.6, 1))])
        .await
        .unwrap();

    // cosine 0.6 against the first animal
    let err = registrar
        .register_vectors(None, owner(), profile(), vec![vector(axis(0))])
        .await
        .unwrap_err();
    match err {
        DomainError::DuplicateIndividual {
            similarity,
            threshold,
            ..
        } => {
            assert!((similarity - 0.6).abs() < 1e-5);
            assert_eq!(threshold, 0.5);
        }
        other => panic!("expected duplicate, got {:?}", other),
    }

    // cosine 0.24 against the first animal
    registrar
        .register_vectors(None, owner(), profile(), vec![vector(blend(0.4, 2))])
        .await
        .unwrap();

    assert_eq!(registry.individual_count().await, 2);
    assert_eq!(registry.embedding_count().await, 2);
}

#[tokio::test]
async fn test_close_scores_are_ambiguous() {
    let registry = Registry::new();
    let first = registry.register_one(blend(0.90, 1)).await.unwrap();
    let second = registry.register_one(blend(0.88, 2)).await.unwrap();

    let report = registry
        .verifier()
        .verify_vectors(&[vector(axis(0))], CallerRole::Mobile, "Aweil")
        .await
        .unwrap();

    let decision = &report.decision;
    assert_eq!(decision.outcome, VerificationOutcome::Ambiguous);
    assert!(decision.individual_id.is_none());
    assert_eq!(decision.candidates.len(), 2);
    assert_eq!(decision.candidates[0].individual_id, first);
    assert_eq!(decision.candidates[1].individual_id, second);
    assert!(report.individual.is_none());
}

#[tokio::test]
async fn test_clear_winner_below_strict_is_partial() {
    let registry = Registry::new();
    let winner = registry.register_one(blend(0.90, 1)).await.unwrap();
    registry.register_one(blend(0.80, 2)).await.unwrap();

    let report = registry
        .verifier()
        .verify_vectors(&[vector(axis(0))], CallerRole::Mobile, "Aweil")
        .await
        .unwrap();

    assert_eq!(report.decision.outcome, VerificationOutcome::Partial);
    assert_eq!(report.decision.individual_id.as_deref(), Some(winner.as_str()));
    assert_eq!(report.decision.threshold, 0.92);
    assert!((report.decision.similarity - 0.90).abs() < 1e-5);
    assert!(report.individual.is_some());
}

#[tokio::test]
async fn test_probes_naming_different_animals_are_ambiguous() {
    let registry = Registry::new();
    registry.register_one(axis(1)).await.unwrap();
    registry.register_one(axis(2)).await.unwrap();

    let report = registry
        .verifier()
        .verify_vectors(
            &[vector(axis(1)), vector(axis(2))],
            CallerRole::Admin,
            "Wau",
        )
        .await
        .unwrap();

    assert_eq!(report.decision.outcome, VerificationOutcome::Ambiguous);
    assert_eq!(report.decision.candidates.len(), 2);

    let logs = VerificationLogRepository::count(registry.store.as_ref())
        .await
        .unwrap();
    assert_eq!(logs, 2);
}

/// Extractor returning the same vector for every image.
struct FixedExtractor(Vec<f32>);

#[async_trait]
impl EmbeddingExtractor for FixedExtractor {
    async fn extract(&self, _image: &[u8]) -> Result<EmbeddingVector, DomainError> {
        EmbeddingVector::new(self.0.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Detector that finds nothing in any frame.
struct BlindDetector;

#[async_trait]
impl NoseDetector for BlindDetector {
    async fn detect(&self, _image: &[u8]) -> Result<Option<NoseRegion>, DomainError> {
        Ok(None)
    }
}

impl Registry {
    fn camera_verifier(&self, reader: NosePrintReader) -> VerifyIndividualUseCase {
        VerifyIndividualUseCase::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            Arc::new(reader),
            MatchThresholds::default(),
        )
    }
}

fn camera_frame() -> CapturedImage {
    CapturedImage::new("frame-0001.jpg", b"live camera frame".to_vec())
}

#[tokio::test]
async fn test_live_frame_without_nose_is_reported_not_raised() {
    let registry = Registry::new();
    registry.register_one(axis(0)).await.unwrap();

    let reader = NosePrintReader::new(Arc::new(FixedExtractor(axis(0))), RegistryMode::Production)
        .with_detector(Arc::new(BlindDetector));
    let report = registry
        .camera_verifier(reader)
        .verify_live(&camera_frame(), "Kuajok")
        .await
        .unwrap();

    assert!(!report.nose_detected);
    assert!(report.verification.is_none());
    assert_eq!(
        VerificationLogRepository::count(registry.store.as_ref())
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_live_frame_uses_live_thresholds() {
    let registry = Registry::new();
    let cow = registry.register_one(blend(0.80, 1)).await.unwrap();

    let reader = NosePrintReader::new(Arc::new(FixedExtractor(axis(0))), RegistryMode::Production);
    let live = registry
        .camera_verifier(reader)
        .verify_live(&camera_frame(), "Kuajok")
        .await
        .unwrap();

    assert!(live.nose_detected);
    let decision = &live.verification.as_ref().expect("frame verified").decision;
    assert_eq!(decision.outcome, VerificationOutcome::Partial);
    assert_eq!(decision.individual_id.as_deref(), Some(cow.as_str()));
    assert_eq!(decision.threshold, 0.85);

    // the same score is below the admission threshold for a mobile caller
    let mobile = registry
        .verifier()
        .verify_vectors(&[vector(axis(0))], CallerRole::Mobile, "Kuajok")
        .await
        .unwrap();
    assert_eq!(mobile.decision.outcome, VerificationOutcome::NotFound);

    let logs = VerificationLogRepository::list(registry.store.as_ref(), None)
        .await
        .unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1].role, CallerRole::Live);
    assert_eq!(logs[1].probe_label, "frame-0001.jpg");
}

#[tokio::test]
async fn test_extra_vectors_are_ignored() {
    let registry = Registry::new();
    registry.register_one(axis(1)).await.unwrap();
    registry.register_one(axis(2)).await.unwrap();

    // the third vector would make the result ambiguous if it were used
    let report = registry
        .verifier()
        .verify_vectors(
            &[vector(axis(1)), vector(axis(1)), vector(axis(2))],
            CallerRole::Mobile,
            "Yambio",
        )
        .await
        .unwrap();

    assert_eq!(report.decision.outcome, VerificationOutcome::Verified);
    assert_eq!(
        VerificationLogRepository::count(registry.store.as_ref())
            .await
            .unwrap(),
        2
    );
}

/// Store that fails on the nth insert and otherwise delegates.
struct FlakyStore {
    inner: Arc<InMemoryRegistry>,
    inserts: AtomicUsize,
    fail_on: usize,
}

#[async_trait]
impl EmbeddingStore for FlakyStore {
    async fn insert(&self, record: NewEmbeddingRecord) -> Result<i64, DomainError> {
        let n = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_on {
            return Err(DomainError::store("disk full"));
        }
        EmbeddingStore::insert(self.inner.as_ref(), record).await
    }

    async fn query_nearest(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<MatchResult>, DomainError> {
        self.inner.query_nearest(query, k).await
    }

    async fn delete_individual(&self, individual_id: &str) -> Result<u64, DomainError> {
        self.inner.delete_individual(individual_id).await
    }

    async fn records_for(&self, individual_id: &str) -> Result<Vec<EmbeddingRecord>, DomainError> {
        self.inner.records_for(individual_id).await
    }

    async fn count(&self) -> Result<u64, DomainError> {
        EmbeddingStore::count(self.inner.as_ref()).await
    }

    async fn count_for(&self, individual_id: &str) -> Result<u64, DomainError> {
        self.inner.count_for(individual_id).await
    }
}

#[tokio::test]
async fn test_failed_insert_leaves_no_trace() {
    let registry = Registry::new();
    let flaky = Arc::new(FlakyStore {
        inner: registry.store.clone(),
        inserts: AtomicUsize::new(0),
        fail_on: 3,
    });
    let registrar = RegisterIndividualUseCase::new(
        registry.store.clone(),
        flaky,
        reader(),
        registry.lock.clone(),
        0.93,
        3,
    );

    let samples = vec![
        vector(blend(0.1, 1)),
        vector(blend(0.1, 2)),
        vector(blend(0.1, 3)),
    ];
    let err = registrar
        .register_vectors(None, owner(), profile(), samples)
        .await
        .unwrap_err();

    assert!(err.is_store_unavailable());
    assert_eq!(registry.individual_count().await, 0);
    assert_eq!(registry.embedding_count().await, 0);
}

#[tokio::test]
async fn test_wrong_sample_count_is_rejected() {
    let registry = Registry::new();
    let err = registry
        .registrar(0.93, 3)
        .register_vectors(None, owner(), profile(), vec![vector(axis(1))])
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::ValidationError(_)));
    assert_eq!(registry.individual_count().await, 0);
}

#[tokio::test]
async fn test_synthetic_vectors_rejected_in_production() {
    let registry = Registry::new();
    let synthetic = EmbeddingVector::synthetic(axis(4)).unwrap();

    let err = registry
        .registrar(0.93, 1)
        .register_vectors(None, owner(), profile(), vec![synthetic])
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::ExtractionFailed(_)));
    assert_eq!(registry.embedding_count().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_near_identical_registrations() {
    let registry = Registry::new();
    let first = registry.registrar(0.93, 1);
    let second = registry.registrar(0.93, 1);

    // cosine 0.99 between the two samples
    let (a, b) = tokio::join!(
        first.register_vectors(None, owner(), profile(), vec![vector(blend(0.99, 1))]),
        second.register_vectors(None, owner(), profile(), vec![vector(axis(0))]),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one registration must win");
    let failure = a.err().or(b.err()).expect("one failure");
    assert!(failure.is_duplicate());
    assert_eq!(registry.individual_count().await, 1);
    assert_eq!(registry.embedding_count().await, 1);
}
