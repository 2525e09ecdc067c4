use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::current_timestamp;
use crate::domain::DomainError;

/// Lifecycle status of a registered individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IndividualStatus {
    #[default]
    Active,
    OwnershipTransferred,
}

impl IndividualStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndividualStatus::Active => "active",
            IndividualStatus::OwnershipTransferred => "ownership-transferred",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "active" => Ok(IndividualStatus::Active),
            "ownership-transferred" | "transferred" => Ok(IndividualStatus::OwnershipTransferred),
            other => Err(DomainError::internal(format!(
                "Unknown individual status '{}'",
                other
            ))),
        }
    }
}

/// Registered owner of an individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
}

impl Owner {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: None,
            phone: None,
            address: None,
            national_id: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_national_id(mut self, national_id: impl Into<String>) -> Self {
        self.national_id = Some(national_id.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.full_name.trim().is_empty() {
            return Err(DomainError::validation("Owner full name is required"));
        }
        Ok(())
    }
}

/// Descriptive attributes of the animal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CattleProfile {
    pub breed: String,
    pub color: String,
    pub age: u32,
}

impl CattleProfile {
    pub fn new(breed: impl Into<String>, color: impl Into<String>, age: u32) -> Self {
        Self {
            breed: breed.into(),
            color: color.into(),
            age,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.breed.trim().is_empty() || self.color.trim().is_empty() {
            return Err(DomainError::validation("Breed and color are required"));
        }
        Ok(())
    }
}

/// One registered cow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    id: String,
    tag: String,
    status: IndividualStatus,
    owner: Owner,
    profile: CattleProfile,
    created_at: i64,
    transferred_at: Option<i64>,
}

impl Individual {
    pub fn new(tag: String, owner: Owner, profile: CattleProfile) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tag,
            status: IndividualStatus::Active,
            owner,
            profile,
            created_at: current_timestamp(),
            transferred_at: None,
        }
    }

    /// Reconstitutes from persisted data (used by adapters).
    pub fn reconstitute(
        id: String,
        tag: String,
        status: IndividualStatus,
        owner: Owner,
        profile: CattleProfile,
        created_at: i64,
        transferred_at: Option<i64>,
    ) -> Self {
        Self {
            id,
            tag,
            status,
            owner,
            profile,
            created_at,
            transferred_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn status(&self) -> IndividualStatus {
        self.status
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn profile(&self) -> &CattleProfile {
        &self.profile
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn transferred_at(&self) -> Option<i64> {
        self.transferred_at
    }

    pub fn is_transferred(&self) -> bool {
        self.status == IndividualStatus::OwnershipTransferred
    }

    /// Hands the individual to `new_owner` and returns the transfer record.
    pub fn transfer_to(&mut self, new_owner: Owner) -> OwnershipTransfer {
        let now = current_timestamp();
        let previous = std::mem::replace(&mut self.owner, new_owner);
        self.status = IndividualStatus::OwnershipTransferred;
        self.transferred_at = Some(now);

        OwnershipTransfer {
            id: Uuid::new_v4().to_string(),
            individual_id: self.id.clone(),
            previous_owner: previous,
            new_owner: self.owner.clone(),
            transferred_at: now,
        }
    }

    pub fn ownership_notice(&self) -> Option<&'static str> {
        if self.is_transferred() {
            Some("Ownership transferred: contact the registry office for full details.")
        } else {
            None
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ({} {}, owner {})",
            self.tag, self.profile.color, self.profile.breed, self.owner.full_name
        )
    }
}

/// Audit record of one ownership change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipTransfer {
    pub id: String,
    pub individual_id: String,
    pub previous_owner: Owner,
    pub new_owner: Owner,
    pub transferred_at: i64,
}

/// An individual together with the number of stored samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualSummary {
    pub individual: Individual,
    pub embedding_count: u64,
}
