use chrono::{Datelike, Utc};
use rand::Rng;

use crate::domain::DomainError;

pub const DEFAULT_TAG_PREFIX: &str = "TW";

const TAG_SUFFIX_LEN: usize = 6;
const TAG_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Produces human-readable tags of the form `<PREFIX>-<YYYY>-<XXXXXX>`.
#[derive(Debug, Clone)]
pub struct TagGenerator {
    prefix: String,
}

impl Default for TagGenerator {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_TAG_PREFIX.to_string(),
        }
    }
}

impl TagGenerator {
    pub fn new(prefix: &str) -> Result<Self, DomainError> {
        let prefix = prefix.trim().to_uppercase();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::validation(format!(
                "Tag prefix must be non-empty and alphanumeric, got '{}'",
                prefix
            )));
        }
        Ok(Self { prefix })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng(), Utc::now().year())
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R, year: i32) -> String {
        let suffix: String = (0..TAG_SUFFIX_LEN)
            .map(|_| TAG_ALPHABET[rng.gen_range(0..TAG_ALPHABET.len())] as char)
            .collect();
        format!("{}-{:04}-{}", self.prefix, year, suffix)
    }

    /// Whether `tag` has this generator's shape.
    pub fn matches(&self, tag: &str) -> bool {
        let mut parts = tag.splitn(3, '-');
        let (Some(prefix), Some(year), Some(suffix)) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        prefix == self.prefix
            && year.len() == 4
            && year.chars().all(|c| c.is_ascii_digit())
            && suffix.len() == TAG_SUFFIX_LEN
            && suffix.bytes().all(|b| TAG_ALPHABET.contains(&b))
    }
}
