use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::application::TransferTarget;
use crate::domain::Owner;

use super::super::Container;
use super::{format_transfer, load_image};

pub struct TransferController<'a> {
    container: &'a Container,
}

impl<'a> TransferController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn transfer(
        &self,
        id_or_tag: Option<String>,
        probe: Option<PathBuf>,
        new_owner: Owner,
    ) -> Result<String> {
        let target = match (id_or_tag, probe) {
            (Some(key), None) => TransferTarget::IdOrTag(key),
            (None, Some(path)) => TransferTarget::Probe(load_image(&path).await?),
            _ => bail!("Give either an id/tag or --probe, not both"),
        };

        let receipt = self
            .container
            .transfer_use_case()
            .execute(target, new_owner)
            .await?;

        Ok(format!(
            "Ownership of {} transferred\n  {}",
            receipt.individual.tag(),
            format_transfer(&receipt.transfer)
        ))
    }
}
