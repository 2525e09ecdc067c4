use serde::{Deserialize, Serialize};

use super::{current_timestamp, CallerRole, MatchCandidate};
use crate::domain::DomainError;

/// Terminal result of one verification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationOutcome {
    NotFound,
    Ambiguous,
    Partial,
    Verified,
}

impl VerificationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationOutcome::NotFound => "not_found",
            VerificationOutcome::Ambiguous => "ambiguous",
            VerificationOutcome::Partial => "partial",
            VerificationOutcome::Verified => "verified",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "not_found" => Ok(VerificationOutcome::NotFound),
            "ambiguous" => Ok(VerificationOutcome::Ambiguous),
            "partial" => Ok(VerificationOutcome::Partial),
            "verified" => Ok(VerificationOutcome::Verified),
            other => Err(DomainError::internal(format!(
                "Unknown verification outcome '{}'",
                other
            ))),
        }
    }

    /// Ordering used when combining several probes: higher is stronger.
    pub fn strength(&self) -> u8 {
        match self {
            VerificationOutcome::NotFound => 0,
            VerificationOutcome::Ambiguous => 1,
            VerificationOutcome::Partial => 2,
            VerificationOutcome::Verified => 3,
        }
    }

    pub fn names_individual(&self) -> bool {
        matches!(
            self,
            VerificationOutcome::Partial | VerificationOutcome::Verified
        )
    }
}

impl std::fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classified verification result, with enough detail for an operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationDecision {
    pub outcome: VerificationOutcome,
    pub individual_id: Option<String>,
    pub tag: Option<String>,
    pub similarity: f32,
    pub candidates: Vec<MatchCandidate>,
    pub threshold: f32,
}

impl VerificationDecision {
    pub fn not_found(similarity: f32, threshold: f32) -> Self {
        Self {
            outcome: VerificationOutcome::NotFound,
            individual_id: None,
            tag: None,
            similarity,
            candidates: Vec::new(),
            threshold,
        }
    }

    pub fn ambiguous(candidates: Vec<MatchCandidate>, threshold: f32) -> Self {
        let similarity = candidates.first().map(|c| c.similarity).unwrap_or(0.0);
        Self {
            outcome: VerificationOutcome::Ambiguous,
            individual_id: None,
            tag: None,
            similarity,
            candidates,
            threshold,
        }
    }

    pub fn identified(
        outcome: VerificationOutcome,
        winner: MatchCandidate,
        threshold: f32,
    ) -> Self {
        Self {
            outcome,
            individual_id: Some(winner.individual_id.clone()),
            tag: Some(winner.tag.clone()),
            similarity: winner.similarity,
            candidates: vec![winner],
            threshold,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.outcome == VerificationOutcome::Verified
    }

    /// Resolves to the identified individual id, or the matching error for
    /// ambiguous and not-found outcomes.
    pub fn require_identified(&self) -> Result<&str, DomainError> {
        match (self.outcome, self.individual_id.as_deref()) {
            (VerificationOutcome::Verified | VerificationOutcome::Partial, Some(id)) => Ok(id),
            (VerificationOutcome::Ambiguous, _) => Err(DomainError::AmbiguousMatch {
                candidates: self.candidates.clone(),
                threshold: self.threshold,
            }),
            _ => Err(DomainError::not_found(format!(
                "No registered individual matches the probe (best similarity {:.3})",
                self.similarity
            ))),
        }
    }
}

/// How a verification was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    NosePrint,
    Tag,
}

impl VerificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationMethod::NosePrint => "nose_print",
            VerificationMethod::Tag => "tag",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "nose_print" => Ok(VerificationMethod::NosePrint),
            "tag" => Ok(VerificationMethod::Tag),
            other => Err(DomainError::internal(format!(
                "Unknown verification method '{}'",
                other
            ))),
        }
    }
}

/// Append-only audit record of one verification attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationLogEntry {
    pub id: i64,
    pub individual_id: Option<String>,
    pub probe_label: String,
    pub similarity: f32,
    pub outcome: VerificationOutcome,
    pub method: VerificationMethod,
    pub role: CallerRole,
    pub location: String,
    pub created_at: i64,
}

/// A log entry before the store assigns its id.
#[derive(Debug, Clone)]
pub struct NewVerificationLog {
    pub individual_id: Option<String>,
    pub probe_label: String,
    pub similarity: f32,
    pub outcome: VerificationOutcome,
    pub method: VerificationMethod,
    pub role: CallerRole,
    pub location: String,
}

impl NewVerificationLog {
    pub fn from_decision(
        decision: &VerificationDecision,
        probe_label: impl Into<String>,
        role: CallerRole,
        location: impl Into<String>,
    ) -> Self {
        let individual_id = if decision.outcome.names_individual() {
            decision.individual_id.clone()
        } else {
            None
        };
        Self {
            individual_id,
            probe_label: probe_label.into(),
            similarity: decision.similarity,
            outcome: decision.outcome,
            method: VerificationMethod::NosePrint,
            role,
            location: location.into(),
        }
    }

    pub fn by_tag(individual_id: &str, role: CallerRole, location: impl Into<String>) -> Self {
        Self {
            individual_id: Some(individual_id.to_string()),
            probe_label: "tag_verification".to_string(),
            similarity: 1.0,
            outcome: VerificationOutcome::Verified,
            method: VerificationMethod::Tag,
            role,
            location: location.into(),
        }
    }

    pub fn into_entry(self, id: i64) -> VerificationLogEntry {
        VerificationLogEntry {
            id,
            individual_id: self.individual_id,
            probe_label: self.probe_label,
            similarity: self.similarity,
            outcome: self.outcome,
            method: self.method,
            role: self.role,
            location: self.location,
            created_at: current_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(tag: &str, similarity: f32) -> MatchCandidate {
        MatchCandidate {
            individual_id: format!("id-{}", tag),
            tag: tag.to_string(),
            similarity,
        }
    }

    #[test]
    fn test_require_identified_returns_winner() {
        let decision = VerificationDecision::identified(
            VerificationOutcome::Partial,
            candidate("TW-1", 0.88),
            0.92,
        );
        assert_eq!(decision.require_identified().unwrap(), "id-TW-1");
    }

    #[test]
    fn test_require_identified_surfaces_ambiguity() {
        let decision = VerificationDecision::ambiguous(
            vec![candidate("TW-1", 0.90), candidate("TW-2", 0.88)],
            0.85,
        );
        match decision.require_identified() {
            Err(DomainError::AmbiguousMatch { candidates, .. }) => assert_eq!(candidates.len(), 2),
            other => panic!("expected ambiguous match, got {:?}", other),
        }
        assert_eq!(decision.similarity, 0.90);
    }

    #[test]
    fn test_log_from_not_found_has_no_individual() {
        let decision = VerificationDecision::not_found(0.42, 0.85);
        let log = NewVerificationLog::from_decision(&decision, "probe.jpg", CallerRole::Mobile, "Juba");
        assert!(log.individual_id.is_none());
        assert_eq!(log.outcome, VerificationOutcome::NotFound);
    }

    #[test]
    fn test_outcome_strength_orders_decisions() {
        assert!(VerificationOutcome::Verified.strength() > VerificationOutcome::Partial.strength());
        assert!(VerificationOutcome::Partial.strength() > VerificationOutcome::Ambiguous.strength());
        assert!(VerificationOutcome::Ambiguous.strength() > VerificationOutcome::NotFound.strength());
    }
}
