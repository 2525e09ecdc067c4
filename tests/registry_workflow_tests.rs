//! End-to-end registry workflows over in-memory storage with the demo
//! extractor, from use cases down and from the CLI router down.

use std::path::PathBuf;

use noseprint::domain::{
    NewReport, ReportFilter, ReportStatus, ReportType, VerificationMethod,
};
use noseprint::{
    CallerRole, CapturedImage, CattleProfile, Commands, Container, ContainerConfig, DomainError,
    MatchThresholds, OutputFormat, Owner, RegistrationRequest, Router, TransferTarget,
    VerificationOutcome, VerificationRequest,
};
use tempfile::tempdir;

fn config(samples: usize) -> ContainerConfig {
    ContainerConfig {
        data_dir: "unused".to_string(),
        memory_storage: true,
        model_url: None,
        detector_url: None,
        synthetic_embeddings: true,
        samples,
        thresholds: MatchThresholds::default(),
    }
}

async fn container() -> Container {
    Container::new(config(3)).await.expect("container")
}

fn image(name: &str) -> CapturedImage {
    CapturedImage::new(name, format!("muzzle photo of {}", name).into_bytes())
}

fn request(animal: &str) -> RegistrationRequest {
    RegistrationRequest {
        tag_prefix: None,
        owner: Owner::new("Nyakuoth Gatluak").with_phone("+211920000000"),
        profile: CattleProfile::new("Ankole", "red", 3),
        images: vec![
            image(&format!("{}-front", animal)),
            image(&format!("{}-left", animal)),
            image(&format!("{}-right", animal)),
        ],
    }
}

fn verification(images: Vec<CapturedImage>, role: CallerRole) -> VerificationRequest {
    VerificationRequest {
        images,
        role,
        location: "Rumbek market".to_string(),
    }
}

fn report(report_type: ReportType, subject: &str) -> NewReport {
    NewReport {
        reporter_name: "Majok Chol".to_string(),
        reporter_phone: None,
        reporter_email: Some("majok@example.org".to_string()),
        tag: Some("tw-2025-abc123".to_string()),
        report_type,
        subject: subject.to_string(),
        message: "Seen near the river crossing".to_string(),
        location: Some("Tonj".to_string()),
    }
}

#[tokio::test]
async fn test_container_requires_an_extractor() {
    let mut cfg = config(3);
    cfg.synthetic_embeddings = false;
    assert!(Container::new(cfg).await.is_err());

    assert!(Container::new(config(0)).await.is_err());
}

#[tokio::test]
async fn test_register_then_verify_by_image_and_tag() {
    let container = container().await;
    let individual = container
        .register_use_case()
        .execute(request("bull"))
        .await
        .unwrap();

    assert!(individual.tag().starts_with("TW-"));
    let details = container
        .list_use_case()
        .details(individual.tag())
        .await
        .unwrap();
    assert_eq!(details.summary.embedding_count, 3);
    assert_eq!(details.sample_labels[0], "front (primary)");

    let report = container
        .verify_use_case()
        .execute(verification(vec![image("bull-left")], CallerRole::Mobile))
        .await
        .unwrap();
    assert_eq!(report.decision.outcome, VerificationOutcome::Verified);
    assert_eq!(report.decision.tag.as_deref(), Some(individual.tag()));

    let by_tag = container
        .verify_tag_use_case()
        .execute(&individual.tag().to_lowercase(), CallerRole::Admin, "Juba")
        .await
        .unwrap();
    assert_eq!(by_tag.individual.id(), individual.id());

    let history = container.history_use_case().execute(None).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].method, VerificationMethod::Tag);
    assert_eq!(history[1].method, VerificationMethod::NosePrint);

    let unknown = container
        .verify_tag_use_case()
        .execute("TW-1999-NOPE00", CallerRole::Mobile, "Juba")
        .await
        .unwrap_err();
    assert!(unknown.is_not_found());
}

#[tokio::test]
async fn test_unknown_animal_is_not_found() {
    let container = container().await;
    container
        .register_use_case()
        .execute(request("heifer"))
        .await
        .unwrap();

    let report = container
        .verify_use_case()
        .execute(verification(vec![image("stranger")], CallerRole::Mobile))
        .await
        .unwrap();
    assert_eq!(report.decision.outcome, VerificationOutcome::NotFound);
    assert!(report.individual.is_none());
}

#[tokio::test]
async fn test_registering_the_same_animal_twice_is_a_duplicate() {
    let container = container().await;
    let use_case = container.register_use_case();
    let first = use_case.execute(request("ox")).await.unwrap();

    match use_case.execute(request("ox")).await {
        Err(DomainError::DuplicateIndividual { individual_id, .. }) => {
            assert_eq!(individual_id, first.id())
        }
        other => panic!("expected duplicate, got {:?}", other),
    }

    let stats = container.stats_use_case().execute().await.unwrap();
    assert_eq!(stats.total_individuals, 1);
    assert_eq!(stats.total_embeddings, 3);
}

#[tokio::test]
async fn test_transfer_by_tag_records_history() {
    let container = container().await;
    let individual = container
        .register_use_case()
        .execute(request("cow"))
        .await
        .unwrap();

    let receipt = container
        .transfer_use_case()
        .execute(
            TransferTarget::IdOrTag(individual.tag().to_string()),
            Owner::new("Abuk Garang"),
        )
        .await
        .unwrap();
    assert!(receipt.individual.is_transferred());
    assert_eq!(receipt.transfer.previous_owner.full_name, "Nyakuoth Gatluak");

    let details = container
        .list_use_case()
        .details(individual.id())
        .await
        .unwrap();
    assert_eq!(details.transfers.len(), 1);
    assert_eq!(details.summary.individual.owner().full_name, "Abuk Garang");

    let report = container
        .verify_use_case()
        .execute(verification(vec![image("cow-front")], CallerRole::Mobile))
        .await
        .unwrap();
    assert!(report.ownership_notice().is_some());

    let same_owner = container
        .transfer_use_case()
        .execute(
            TransferTarget::IdOrTag(individual.id().to_string()),
            Owner::new("Abuk Garang"),
        )
        .await
        .unwrap_err();
    assert!(matches!(same_owner, DomainError::ValidationError(_)));
}

#[tokio::test]
async fn test_transfer_by_probe_photo() {
    let container = container().await;
    let individual = container
        .register_use_case()
        .execute(request("calf"))
        .await
        .unwrap();

    let receipt = container
        .transfer_use_case()
        .execute(
            TransferTarget::Probe(image("calf-right")),
            Owner::new("Kuol Akech"),
        )
        .await
        .unwrap();
    assert_eq!(receipt.individual.id(), individual.id());

    let missing = container
        .transfer_use_case()
        .execute(TransferTarget::Probe(image("goat")), Owner::new("Kuol Akech"))
        .await
        .unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn test_delete_cascades() {
    let container = container().await;
    let individual = container
        .register_use_case()
        .execute(request("steer"))
        .await
        .unwrap();
    container
        .verify_use_case()
        .execute(verification(vec![image("steer-front")], CallerRole::Admin))
        .await
        .unwrap();

    container
        .delete_use_case()
        .execute(individual.tag())
        .await
        .unwrap();

    let stats = container.stats_use_case().execute().await.unwrap();
    assert_eq!(stats.total_individuals, 0);
    assert_eq!(stats.total_embeddings, 0);
    assert!(container
        .history_use_case()
        .for_individual(individual.id())
        .await
        .unwrap()
        .is_empty());

    let report = container
        .verify_use_case()
        .execute(verification(vec![image("steer-front")], CallerRole::Admin))
        .await
        .unwrap();
    assert_eq!(report.decision.outcome, VerificationOutcome::NotFound);

    let again = container
        .delete_use_case()
        .execute(individual.id())
        .await
        .unwrap_err();
    assert!(again.is_not_found());
}

#[tokio::test]
async fn test_reports_lifecycle() {
    let container = container().await;
    let reports = container.reports_use_case();

    let theft = reports
        .submit(report(ReportType::Theft, "Stolen bull"))
        .await
        .unwrap();
    reports
        .submit(report(ReportType::Suspect, "Unbranded herd"))
        .await
        .unwrap();
    assert_eq!(theft.tag.as_deref(), Some("TW-2025-ABC123"));

    let thefts = reports
        .list(ReportFilter {
            status: None,
            report_type: Some(ReportType::Theft),
        })
        .await
        .unwrap();
    assert_eq!(thefts.len(), 1);
    assert_eq!(thefts[0].id, theft.id);

    let replied = reports
        .reply(theft.id, "Animal recovered", ReportStatus::Resolved)
        .await
        .unwrap();
    assert_eq!(replied.status, ReportStatus::Resolved);
    assert_eq!(
        reports.status(theft.id).await.unwrap().admin_reply.as_deref(),
        Some("Animal recovered")
    );

    let stats = container.stats_use_case().execute().await.unwrap();
    assert_eq!(stats.pending_reports, 1);

    assert!(reports.status(999).await.unwrap_err().is_not_found());
}

async fn write_images(dir: &std::path::Path, animal: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for angle in ["front", "left", "right"] {
        let path = dir.join(format!("{}-{}.jpg", animal, angle));
        tokio::fs::write(&path, format!("{} {}", animal, angle))
            .await
            .unwrap();
        paths.push(path);
    }
    paths
}

#[tokio::test]
async fn test_router_register_verify_and_stats() {
    let dir = tempdir().expect("tempdir");
    let images = write_images(dir.path(), "bull").await;
    let container = container().await;
    let router = Router::new(&container);

    let output = router
        .route(Commands::Register {
            images: images.clone(),
            owner: "Deng Akol".to_string(),
            owner_phone: None,
            owner_email: None,
            owner_address: None,
            owner_national_id: None,
            breed: "Zebu".to_string(),
            color: "black".to_string(),
            age: 6,
            tag_prefix: Some("ss".to_string()),
            format: OutputFormat::Json,
        })
        .await
        .unwrap();
    let registered: serde_json::Value = serde_json::from_str(&output).unwrap();
    let tag = registered["tag"].as_str().unwrap().to_string();
    assert!(tag.starts_with("SS-"));

    let output = router
        .route(Commands::Verify {
            images: vec![images[0].clone()],
            role: "mobile".to_string(),
            location: "Bor".to_string(),
            format: OutputFormat::Text,
        })
        .await
        .unwrap();
    assert!(output.starts_with("VERIFIED"));
    assert!(output.contains(&tag));

    let output = router
        .route(Commands::VerifyLive {
            frame: images[1].clone(),
            location: "Bor cattle camp".to_string(),
            format: OutputFormat::Json,
        })
        .await
        .unwrap();
    let live: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(live["nose_detected"], true);
    assert_eq!(live["verification"]["role"], "live");
    assert_eq!(live["verification"]["decision"]["outcome"], "VERIFIED");

    let output = router
        .route(Commands::Show {
            id_or_tag: tag.clone(),
            format: OutputFormat::Text,
        })
        .await
        .unwrap();
    assert!(output.contains("Deng Akol"));

    let output = router
        .route(Commands::Stats {
            format: OutputFormat::Json,
        })
        .await
        .unwrap();
    let stats: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(stats["total_individuals"], 1);
    assert_eq!(stats["total_verifications"], 2);
    assert_eq!(stats["successful_verifications"], 2);

    let err = router
        .route(Commands::Verify {
            images: vec![images[0].clone()],
            role: "guest".to_string(),
            location: "Bor".to_string(),
            format: OutputFormat::Text,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("guest"));
}
