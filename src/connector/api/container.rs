use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use crate::application::{
    DashboardStatsUseCase, DeleteIndividualUseCase, EmbeddingExtractor, ListIndividualsUseCase,
    NosePrintReader, RegisterIndividualUseCase, RegistrationLock, RegistryMode, ReportsUseCase,
    TransferOwnershipUseCase, VerificationHistoryUseCase, VerifyByTagUseCase,
    VerifyIndividualUseCase,
};
use crate::connector::adapter::{
    DuckdbEmbeddingStore, DuckdbRegistryRepository, InMemoryRegistry, RemoteModelClient,
    RemoteNoseDetector, SyntheticExtractor,
};
use crate::domain::{
    EmbeddingStore, IndividualRepository, MatchThresholds, ReportRepository,
    VerificationLogRepository,
};

pub const DATABASE_FILE: &str = "noseprint.duckdb";

pub struct ContainerConfig {
    pub data_dir: String,
    pub memory_storage: bool,
    /// Embedding model endpoint. Required unless `synthetic_embeddings`.
    pub model_url: Option<String>,
    pub detector_url: Option<String>,
    /// Demo mode: synthetic vectors replace the model and are accepted by
    /// the registry. Never combine with real registrations.
    pub synthetic_embeddings: bool,
    pub samples: usize,
    pub thresholds: MatchThresholds,
}

pub struct Container {
    embedding_store: Arc<dyn EmbeddingStore>,
    individual_repo: Arc<dyn IndividualRepository>,
    log_repo: Arc<dyn VerificationLogRepository>,
    report_repo: Arc<dyn ReportRepository>,
    reader: Arc<NosePrintReader>,
    registration_lock: Arc<RegistrationLock>,
    config: ContainerConfig,
}

impl Container {
    pub async fn new(config: ContainerConfig) -> Result<Self> {
        config.thresholds.validate()?;
        if config.samples == 0 {
            bail!("--samples must be at least 1");
        }

        let (extractor, mode): (Arc<dyn EmbeddingExtractor>, RegistryMode) =
            if config.synthetic_embeddings {
                warn!("Demo mode: synthetic embeddings are not biometric data");
                (Arc::new(SyntheticExtractor::new()), RegistryMode::Demo)
            } else if let Some(url) = config.model_url.as_deref() {
                debug!("Using remote embedding model at {}", url);
                (Arc::new(RemoteModelClient::from_env(url)), RegistryMode::Production)
            } else {
                bail!(
                    "No embedding model configured: pass --model-url, or --synthetic-embeddings for a labelled demo"
                );
            };

        let mut reader = NosePrintReader::new(extractor, mode);
        if let Some(url) = config.detector_url.as_deref() {
            debug!("Using remote nose detector at {}", url);
            reader = reader.with_detector(Arc::new(RemoteNoseDetector::new(
                RemoteModelClient::from_env(url),
            )));
        }

        let (embedding_store, individual_repo, log_repo, report_repo): (
            Arc<dyn EmbeddingStore>,
            Arc<dyn IndividualRepository>,
            Arc<dyn VerificationLogRepository>,
            Arc<dyn ReportRepository>,
        ) = if config.memory_storage {
            debug!("Using in-memory registry storage");
            let registry = Arc::new(InMemoryRegistry::new());
            (
                registry.clone(),
                registry.clone(),
                registry.clone(),
                registry,
            )
        } else {
            let db_path = PathBuf::from(&config.data_dir).join(DATABASE_FILE);
            let store = DuckdbEmbeddingStore::new(&db_path)?;
            // DuckDB allows a single write connection per file.
            let registry = Arc::new(DuckdbRegistryRepository::with_connection(
                store.shared_connection(),
            ));
            info!("Using DuckDB registry at {}", db_path.display());
            (
                Arc::new(store),
                registry.clone(),
                registry.clone(),
                registry,
            )
        };

        Ok(Self {
            embedding_store,
            individual_repo,
            log_repo,
            report_repo,
            reader: Arc::new(reader),
            registration_lock: Arc::new(RegistrationLock::new()),
            config,
        })
    }

    pub fn register_use_case(&self) -> RegisterIndividualUseCase {
        RegisterIndividualUseCase::new(
            self.individual_repo.clone(),
            self.embedding_store.clone(),
            self.reader.clone(),
            self.registration_lock.clone(),
            self.config.thresholds.duplicate,
            self.config.samples,
        )
    }

    pub fn verify_use_case(&self) -> VerifyIndividualUseCase {
        VerifyIndividualUseCase::new(
            self.embedding_store.clone(),
            self.individual_repo.clone(),
            self.log_repo.clone(),
            self.reader.clone(),
            self.config.thresholds,
        )
    }

    pub fn verify_tag_use_case(&self) -> VerifyByTagUseCase {
        VerifyByTagUseCase::new(self.individual_repo.clone(), self.log_repo.clone())
    }

    pub fn transfer_use_case(&self) -> TransferOwnershipUseCase {
        TransferOwnershipUseCase::new(
            self.individual_repo.clone(),
            self.embedding_store.clone(),
            self.reader.clone(),
            self.config.thresholds,
        )
    }

    pub fn delete_use_case(&self) -> DeleteIndividualUseCase {
        DeleteIndividualUseCase::new(self.individual_repo.clone())
    }

    pub fn list_use_case(&self) -> ListIndividualsUseCase {
        ListIndividualsUseCase::new(self.individual_repo.clone(), self.embedding_store.clone())
    }

    pub fn reports_use_case(&self) -> ReportsUseCase {
        ReportsUseCase::new(self.report_repo.clone())
    }

    pub fn history_use_case(&self) -> VerificationHistoryUseCase {
        VerificationHistoryUseCase::new(self.log_repo.clone())
    }

    pub fn stats_use_case(&self) -> DashboardStatsUseCase {
        DashboardStatsUseCase::new(
            self.individual_repo.clone(),
            self.embedding_store.clone(),
            self.log_repo.clone(),
            self.report_repo.clone(),
        )
    }

    pub fn data_dir(&self) -> &str {
        &self.config.data_dir
    }

    pub fn memory_storage(&self) -> bool {
        self.config.memory_storage
    }

    pub fn mode(&self) -> RegistryMode {
        self.reader.mode()
    }

    pub fn thresholds(&self) -> MatchThresholds {
        self.config.thresholds
    }

    pub fn samples(&self) -> usize {
        self.config.samples
    }
}
