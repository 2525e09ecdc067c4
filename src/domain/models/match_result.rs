use serde::{Deserialize, Serialize};

/// One ranked hit from a nearest-neighbour query. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    individual_id: String,
    tag: String,
    similarity: f32,
    record_id: i64,
}

impl MatchResult {
    pub fn new(individual_id: String, tag: String, similarity: f32, record_id: i64) -> Self {
        Self {
            individual_id,
            tag,
            similarity,
            record_id,
        }
    }

    pub fn individual_id(&self) -> &str {
        &self.individual_id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn similarity(&self) -> f32 {
        self.similarity
    }

    /// Id of the embedding record that produced this score.
    pub fn record_id(&self) -> i64 {
        self.record_id
    }

    pub fn is_above(&self, threshold: f32) -> bool {
        self.similarity > threshold
    }

    pub fn to_candidate(&self) -> MatchCandidate {
        MatchCandidate {
            individual_id: self.individual_id.clone(),
            tag: self.tag.clone(),
            similarity: self.similarity,
        }
    }

    pub fn display_line(&self) -> String {
        format!("{} (similarity: {:.3})", self.tag, self.similarity)
    }
}

/// Best score of one distinct individual, shown to operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub individual_id: String,
    pub tag: String,
    pub similarity: f32,
}
