use std::path::PathBuf;

use anyhow::Result;

use crate::application::RegistrationRequest;
use crate::cli::OutputFormat;
use crate::domain::{CattleProfile, Individual, Owner};

use super::super::Container;
use super::load_images;

pub struct RegisterController<'a> {
    container: &'a Container,
}

impl<'a> RegisterController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn register(
        &self,
        images: Vec<PathBuf>,
        owner: Owner,
        profile: CattleProfile,
        tag_prefix: Option<String>,
        format: OutputFormat,
    ) -> Result<String> {
        let request = RegistrationRequest {
            tag_prefix,
            owner,
            profile,
            images: load_images(&images).await?,
        };

        let individual = self.container.register_use_case().execute(request).await?;

        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(&individual)?,
            OutputFormat::Text => self.format_registered(&individual),
        })
    }

    fn format_registered(&self, individual: &Individual) -> String {
        format!(
            "Registered {}\n  Id:      {}\n  Owner:   {}\n  Animal:  {} {}, age {}\n  Samples: {}",
            individual.tag(),
            individual.id(),
            individual.owner().full_name,
            individual.profile().color,
            individual.profile().breed,
            individual.profile().age,
            self.container.samples()
        )
    }
}
