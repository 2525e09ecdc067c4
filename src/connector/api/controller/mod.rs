pub mod individual_controller;
pub mod register_controller;
pub mod report_controller;
pub mod stats_controller;
pub mod transfer_controller;
pub mod verify_controller;

pub use individual_controller::IndividualController;
pub use register_controller::RegisterController;
pub use report_controller::ReportController;
pub use stats_controller::StatsController;
pub use transfer_controller::TransferController;
pub use verify_controller::VerifyController;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::CapturedImage;
use crate::domain::{Owner, OwnershipTransfer};

pub(crate) async fn load_image(path: &Path) -> Result<CapturedImage> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(CapturedImage::new(label, bytes))
}

pub(crate) async fn load_images(paths: &[PathBuf]) -> Result<Vec<CapturedImage>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(load_image(path).await?);
    }
    Ok(images)
}

pub(crate) fn build_owner(
    name: String,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    national_id: Option<String>,
) -> Owner {
    Owner {
        full_name: name,
        email,
        phone,
        address,
        national_id,
    }
}

pub(crate) fn format_timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

pub(crate) fn format_transfer(transfer: &OwnershipTransfer) -> String {
    format!(
        "{}: {} -> {}",
        format_timestamp(transfer.transferred_at),
        transfer.previous_owner.full_name,
        transfer.new_owner.full_name
    )
}
