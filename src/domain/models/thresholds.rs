use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const DUPLICATE_THRESHOLD: f32 = 0.93;
pub const VERIFY_THRESHOLD: f32 = 0.85;
pub const STRICT_THRESHOLD_MOBILE: f32 = 0.92;
pub const STRICT_THRESHOLD_ADMIN: f32 = 0.90;
pub const AMBIGUITY_GAP: f32 = 0.05;
/// Live-camera frames are noisier; a weaker match is admitted as partial.
pub const LIVE_VERIFY_THRESHOLD: f32 = 0.75;
pub const STRICT_THRESHOLD_LIVE: f32 = 0.85;

/// Who is asking for a verification; selects the thresholds applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallerRole {
    #[default]
    Mobile,
    Admin,
    /// Single frame from a live camera feed.
    Live,
}

impl CallerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallerRole::Mobile => "mobile",
            CallerRole::Admin => "admin",
            CallerRole::Live => "live",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.to_lowercase().as_str() {
            "mobile" => Ok(CallerRole::Mobile),
            "admin" => Ok(CallerRole::Admin),
            "live" => Ok(CallerRole::Live),
            other => Err(DomainError::validation(format!(
                "Unknown caller role '{}', expected mobile, admin or live",
                other
            ))),
        }
    }
}

/// Tunable decision constants for every matching call site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchThresholds {
    pub duplicate: f32,
    pub verify: f32,
    pub strict_mobile: f32,
    pub strict_admin: f32,
    pub verify_live: f32,
    pub strict_live: f32,
    pub ambiguity_gap: f32,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            duplicate: DUPLICATE_THRESHOLD,
            verify: VERIFY_THRESHOLD,
            strict_mobile: STRICT_THRESHOLD_MOBILE,
            strict_admin: STRICT_THRESHOLD_ADMIN,
            verify_live: LIVE_VERIFY_THRESHOLD,
            strict_live: STRICT_THRESHOLD_LIVE,
            ambiguity_gap: AMBIGUITY_GAP,
        }
    }
}

impl MatchThresholds {
    pub fn with_duplicate(mut self, value: f32) -> Self {
        self.duplicate = value;
        self
    }

    pub fn with_verify(mut self, value: f32) -> Self {
        self.verify = value;
        self
    }

    pub fn with_strict(mut self, role: CallerRole, value: f32) -> Self {
        match role {
            CallerRole::Mobile => self.strict_mobile = value,
            CallerRole::Admin => self.strict_admin = value,
            CallerRole::Live => self.strict_live = value,
        }
        self
    }

    pub fn with_live_verify(mut self, value: f32) -> Self {
        self.verify_live = value;
        self
    }

    pub fn with_ambiguity_gap(mut self, value: f32) -> Self {
        self.ambiguity_gap = value;
        self
    }

    pub fn strict_for(&self, role: CallerRole) -> f32 {
        match role {
            CallerRole::Mobile => self.strict_mobile,
            CallerRole::Admin => self.strict_admin,
            CallerRole::Live => self.strict_live,
        }
    }

    /// Admission threshold: live frames use their own, every other caller
    /// shares `verify`.
    pub fn verify_for(&self, role: CallerRole) -> f32 {
        match role {
            CallerRole::Live => self.verify_live,
            CallerRole::Mobile | CallerRole::Admin => self.verify,
        }
    }

    pub fn for_role(&self, role: CallerRole) -> VerificationThresholds {
        VerificationThresholds {
            verify: self.verify_for(role),
            strict: self.strict_for(role),
            ambiguity_gap: self.ambiguity_gap,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let similarities = [
            ("duplicate", self.duplicate),
            ("verify", self.verify),
            ("strict_mobile", self.strict_mobile),
            ("strict_admin", self.strict_admin),
            ("verify_live", self.verify_live),
            ("strict_live", self.strict_live),
        ];
        for (name, value) in similarities {
            if !(-1.0..=1.0).contains(&value) {
                return Err(DomainError::validation(format!(
                    "Threshold {} must lie in [-1, 1], got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=2.0).contains(&self.ambiguity_gap) {
            return Err(DomainError::validation(format!(
                "Ambiguity gap must lie in [0, 2], got {}",
                self.ambiguity_gap
            )));
        }
        if self.strict_mobile < self.verify
            || self.strict_admin < self.verify
            || self.strict_live < self.verify_live
        {
            return Err(DomainError::validation(
                "Strict thresholds must not be below the verify threshold",
            ));
        }
        Ok(())
    }
}

/// The three constants the verification policy needs for one call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerificationThresholds {
    pub verify: f32,
    pub strict: f32,
    pub ambiguity_gap: f32,
}

impl Default for VerificationThresholds {
    fn default() -> Self {
        MatchThresholds::default().for_role(CallerRole::Mobile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_selects_strict_threshold() {
        let thresholds = MatchThresholds::default();

        assert_eq!(thresholds.for_role(CallerRole::Mobile).strict, 0.92);
        assert_eq!(thresholds.for_role(CallerRole::Admin).strict, 0.90);
        assert_eq!(thresholds.for_role(CallerRole::Admin).verify, 0.85);
    }

    #[test]
    fn test_live_frames_have_their_own_thresholds() {
        let thresholds = MatchThresholds::default();
        let live = thresholds.for_role(CallerRole::Live);
        assert_eq!(live.verify, 0.75);
        assert_eq!(live.strict, 0.85);

        let tuned = thresholds.with_live_verify(0.80).with_strict(CallerRole::Live, 0.88);
        assert_eq!(tuned.for_role(CallerRole::Live).verify, 0.80);
        assert_eq!(tuned.for_role(CallerRole::Live).strict, 0.88);
        assert_eq!(tuned.for_role(CallerRole::Mobile).verify, 0.85);

        assert!(thresholds.with_live_verify(0.90).validate().is_err());
    }

    #[test]
    fn test_overrides_are_validated() {
        assert!(MatchThresholds::default().validate().is_ok());
        assert!(MatchThresholds::default().with_duplicate(1.5).validate().is_err());
        assert!(MatchThresholds::default()
            .with_strict(CallerRole::Admin, 0.80)
            .validate()
            .is_err());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(CallerRole::parse("ADMIN").unwrap(), CallerRole::Admin);
        assert_eq!(CallerRole::parse("live").unwrap(), CallerRole::Live);
        assert!(CallerRole::parse("guest").is_err());
    }
}
