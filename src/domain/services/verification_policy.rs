use std::collections::HashSet;

use crate::domain::{
    MatchCandidate, MatchResult, VerificationDecision, VerificationOutcome,
    VerificationThresholds,
};

/// Candidates reported with an ambiguous decision.
pub const MAX_AMBIGUOUS_CANDIDATES: usize = 3;

/// Turns a ranked match list into one of the four verification outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationPolicy {
    thresholds: VerificationThresholds,
}

impl VerificationPolicy {
    pub fn new(thresholds: VerificationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> VerificationThresholds {
        self.thresholds
    }

    /// `ranked` must be ordered most similar first, as produced by the
    /// match engine over the whole store.
    pub fn classify(&self, ranked: &[MatchResult]) -> VerificationDecision {
        let verify = self.thresholds.verify;

        let best = match ranked.first() {
            Some(best) => best,
            None => return VerificationDecision::not_found(0.0, verify),
        };

        if best.similarity() <= verify {
            return VerificationDecision::not_found(best.similarity(), verify);
        }

        let qualifying: Vec<MatchCandidate> = best_per_individual(ranked)
            .into_iter()
            .filter(|c| c.similarity > verify)
            .collect();

        if let Some(second) = qualifying.get(1) {
            let gap = best.similarity() - second.similarity;
            if gap <= self.thresholds.ambiguity_gap {
                let candidates = qualifying
                    .into_iter()
                    .take(MAX_AMBIGUOUS_CANDIDATES)
                    .collect();
                return VerificationDecision::ambiguous(candidates, verify);
            }
        }

        let strict = self.thresholds.strict;
        let outcome = if best.similarity() > strict {
            VerificationOutcome::Verified
        } else {
            VerificationOutcome::Partial
        };
        VerificationDecision::identified(outcome, best.to_candidate(), strict)
    }

    /// Merges per-probe decisions for the same animal. Probes naming two
    /// different individuals make the result ambiguous; otherwise the
    /// strongest decision wins, then the higher similarity.
    pub fn combine(&self, decisions: Vec<VerificationDecision>) -> VerificationDecision {
        let mut named: Vec<MatchCandidate> = Vec::new();
        for decision in decisions.iter().filter(|d| d.outcome.names_individual()) {
            if let Some(winner) = decision.candidates.first() {
                match named.iter_mut().find(|c| c.individual_id == winner.individual_id) {
                    Some(existing) if existing.similarity < winner.similarity => {
                        existing.similarity = winner.similarity
                    }
                    Some(_) => {}
                    None => named.push(winner.clone()),
                }
            }
        }

        if named.len() > 1 {
            named.sort_by(|a, b| {
                b.similarity
                    .partial_cmp(&a.similarity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            named.truncate(MAX_AMBIGUOUS_CANDIDATES);
            return VerificationDecision::ambiguous(named, self.thresholds.verify);
        }

        decisions
            .into_iter()
            .max_by(|a, b| {
                a.outcome
                    .strength()
                    .cmp(&b.outcome.strength())
                    .then_with(|| {
                        a.similarity
                            .partial_cmp(&b.similarity)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
            })
            .unwrap_or_else(|| VerificationDecision::not_found(0.0, self.thresholds.verify))
    }
}

/// Best-scoring record of each distinct individual, in rank order.
fn best_per_individual(ranked: &[MatchResult]) -> Vec<MatchCandidate> {
    let mut seen = HashSet::new();
    ranked
        .iter()
        .filter(|m| seen.insert(m.individual_id().to_string()))
        .map(MatchResult::to_candidate)
        .collect()
}
