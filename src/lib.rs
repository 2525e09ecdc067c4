pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    CapturedImage, DashboardStatsUseCase, DeleteIndividualUseCase, EmbeddingExtractor,
    ListIndividualsUseCase, NoseDetector, NosePrintReader, RegisterIndividualUseCase,
    RegistrationLock, RegistrationRequest, RegistryMode, ReportsUseCase, TransferOwnershipUseCase,
    TransferTarget, VerificationHistoryUseCase, VerificationRequest, VerifyByTagUseCase,
    VerifyIndividualUseCase,
};

pub use cli::{Commands, OutputFormat, ReportCommands};

pub use connector::{
    Container, ContainerConfig, DuckdbEmbeddingStore, DuckdbRegistryRepository, InMemoryRegistry,
    RemoteModelClient, RemoteNoseDetector, Router, SyntheticExtractor,
};

pub use domain::{
    CallerRole, CascadeDeletion, CattleProfile, DomainError, DuplicateGuard, EmbeddingRecord,
    EmbeddingStore, EmbeddingVector, Individual, IndividualRepository, MatchEngine, MatchResult,
    MatchThresholds, Owner, ReportRepository, VerificationDecision, VerificationLogRepository,
    VerificationOutcome, VerificationPolicy,
};
