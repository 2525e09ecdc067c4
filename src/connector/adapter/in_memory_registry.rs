use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{
    rank, CascadeDeletion, DomainError, EmbeddingRecord, EmbeddingStore, Individual, IndividualRepository,
    MatchResult, NewEmbeddingRecord, NewReport, NewVerificationLog, OwnershipTransfer,
    RankCandidate, Report, ReportFilter, ReportRepository, VerificationLogEntry,
    VerificationLogRepository, VerificationOutcome,
};

#[derive(Default)]
struct RegistryState {
    individuals: HashMap<String, Individual>,
    transfers: Vec<OwnershipTransfer>,
    embeddings: Vec<EmbeddingRecord>,
    logs: Vec<VerificationLogEntry>,
    reports: Vec<Report>,
    last_embedding_id: i64,
    last_log_id: i64,
    last_report_id: i64,
}

/// Process-local registry implementing every repository port over one
/// lock, so a cascade delete is observed all at once.
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmbeddingStore for InMemoryRegistry {
    async fn insert(&self, record: NewEmbeddingRecord) -> Result<i64, DomainError> {
        record.validate()?;

        let mut state = self.state.write().await;
        state.last_embedding_id += 1;
        let id = state.last_embedding_id;
        state.embeddings.push(EmbeddingRecord::from_new(id, record));

        debug!("Stored embedding record {} in memory", id);
        Ok(id)
    }

    async fn query_nearest(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<MatchResult>, DomainError> {
        let state = self.state.read().await;
        let candidates = state.embeddings.iter().map(|record| RankCandidate {
            record_id: record.id(),
            individual_id: record.individual_id(),
            tag: state
                .individuals
                .get(record.individual_id())
                .map(|i| i.tag())
                .unwrap_or_default(),
            vector: record.vector(),
        });
        rank(query, candidates, k)
    }

    async fn delete_individual(&self, individual_id: &str) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let before = state.embeddings.len();
        state
            .embeddings
            .retain(|record| record.individual_id() != individual_id);
        Ok((before - state.embeddings.len()) as u64)
    }

    async fn records_for(&self, individual_id: &str) -> Result<Vec<EmbeddingRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .embeddings
            .iter()
            .filter(|record| record.individual_id() == individual_id)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.state.read().await.embeddings.len() as u64)
    }

    async fn count_for(&self, individual_id: &str) -> Result<u64, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .embeddings
            .iter()
            .filter(|record| record.individual_id() == individual_id)
            .count() as u64)
    }
}

#[async_trait]
impl IndividualRepository for InMemoryRegistry {
    async fn save(&self, individual: &Individual) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.individuals.contains_key(individual.id()) {
            return Err(DomainError::validation(format!(
                "Individual {} already exists",
                individual.id()
            )));
        }
        if state.individuals.values().any(|i| i.tag() == individual.tag()) {
            return Err(DomainError::validation(format!(
                "Tag {} is already in use",
                individual.tag()
            )));
        }
        state
            .individuals
            .insert(individual.id().to_string(), individual.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Individual>, DomainError> {
        Ok(self.state.read().await.individuals.get(id).cloned())
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Option<Individual>, DomainError> {
        let state = self.state.read().await;
        Ok(state.individuals.values().find(|i| i.tag() == tag).cloned())
    }

    async fn list(&self) -> Result<Vec<Individual>, DomainError> {
        let state = self.state.read().await;
        let mut individuals: Vec<Individual> = state.individuals.values().cloned().collect();
        individuals.sort_by(|a, b| a.tag().cmp(b.tag()));
        Ok(individuals)
    }

    async fn apply_transfer(
        &self,
        individual: &Individual,
        transfer: &OwnershipTransfer,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.individuals.get_mut(individual.id()) {
            Some(existing) => *existing = individual.clone(),
            None => {
                return Err(DomainError::not_found(format!(
                    "Individual not found: {}",
                    individual.id()
                )))
            }
        }
        state.transfers.push(transfer.clone());
        Ok(())
    }

    async fn transfers_for(&self, id: &str) -> Result<Vec<OwnershipTransfer>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .transfers
            .iter()
            .filter(|t| t.individual_id == id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.individuals.remove(id);
        state.transfers.retain(|t| t.individual_id != id);
        Ok(())
    }

    async fn delete_cascade(&self, id: &str) -> Result<CascadeDeletion, DomainError> {
        let mut state = self.state.write().await;
        let embeddings = state.embeddings.len();
        let logs = state.logs.len();
        let transfers = state.transfers.len();

        state.embeddings.retain(|record| record.individual_id() != id);
        state
            .logs
            .retain(|log| log.individual_id.as_deref() != Some(id));
        state.transfers.retain(|t| t.individual_id != id);
        state.individuals.remove(id);

        Ok(CascadeDeletion {
            embeddings: (embeddings - state.embeddings.len()) as u64,
            verification_logs: (logs - state.logs.len()) as u64,
            transfers: (transfers - state.transfers.len()) as u64,
        })
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.state.read().await.individuals.len() as u64)
    }
}

#[async_trait]
impl VerificationLogRepository for InMemoryRegistry {
    async fn append(&self, entry: NewVerificationLog) -> Result<VerificationLogEntry, DomainError> {
        let mut state = self.state.write().await;
        state.last_log_id += 1;
        let entry = entry.into_entry(state.last_log_id);
        state.logs.push(entry.clone());
        Ok(entry)
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<VerificationLogEntry>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .logs
            .iter()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn list_for_individual(
        &self,
        individual_id: &str,
    ) -> Result<Vec<VerificationLogEntry>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .logs
            .iter()
            .rev()
            .filter(|log| log.individual_id.as_deref() == Some(individual_id))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.state.read().await.logs.len() as u64)
    }

    async fn count_by_outcome(&self, outcome: VerificationOutcome) -> Result<u64, DomainError> {
        let state = self.state.read().await;
        Ok(state.logs.iter().filter(|log| log.outcome == outcome).count() as u64)
    }
}

#[async_trait]
impl ReportRepository for InMemoryRegistry {
    async fn submit(&self, report: NewReport) -> Result<Report, DomainError> {
        let mut state = self.state.write().await;
        state.last_report_id += 1;
        let report = report.into_report(state.last_report_id);
        state.reports.push(report.clone());
        Ok(report)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Report>, DomainError> {
        let state = self.state.read().await;
        Ok(state.reports.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, filter: ReportFilter) -> Result<Vec<Report>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .reports
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn update(&self, report: &Report) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.reports.iter_mut().find(|r| r.id == report.id) {
            Some(existing) => {
                *existing = report.clone();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Report not found: {}",
                report.id
            ))),
        }
    }

    async fn count(&self, filter: ReportFilter) -> Result<u64, DomainError> {
        let state = self.state.read().await;
        Ok(state.reports.iter().filter(|r| filter.matches(r)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CattleProfile, Owner, EMBEDDING_DIMENSIONS};

    fn unit_vector(hot: usize) -> Vec<f32> {
        let mut v = vec![0.0; EMBEDDING_DIMENSIONS];
        v[hot] = 1.0;
        v
    }

    fn individual(tag: &str) -> Individual {
        Individual::new(
            tag.to_string(),
            Owner::new("Garang Mabior"),
            CattleProfile::new("Nganda", "white", 3),
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids_and_joins_tag() {
        let registry = InMemoryRegistry::new();
        let cow = individual("TW-2025-AAAAAA");
        IndividualRepository::save(&registry, &cow).await.unwrap();

        let first = registry
            .insert(NewEmbeddingRecord::new(cow.id(), unit_vector(0), "front"))
            .await
            .unwrap();
        let second = registry
            .insert(NewEmbeddingRecord::new(cow.id(), unit_vector(1), "left"))
            .await
            .unwrap();
        assert!(second > first);

        let hits = registry.query_nearest(&unit_vector(1), 1).await.unwrap();
        assert_eq!(hits[0].record_id(), second);
        assert_eq!(hits[0].tag(), "TW-2025-AAAAAA");
    }

    #[tokio::test]
    async fn test_insert_rejects_bad_vectors() {
        let registry = InMemoryRegistry::new();
        let short = registry
            .insert(NewEmbeddingRecord::new("cow", vec![1.0; 255], "front"))
            .await;
        let zero = registry
            .insert(NewEmbeddingRecord::new("cow", vec![0.0; EMBEDDING_DIMENSIONS], "front"))
            .await;

        assert!(matches!(short, Err(DomainError::DimensionMismatch { .. })));
        assert!(matches!(zero, Err(DomainError::DegenerateVector)));
        assert_eq!(EmbeddingStore::count(&registry).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_tag_is_rejected() {
        let registry = InMemoryRegistry::new();
        IndividualRepository::save(&registry, &individual("TW-2025-BBBBBB"))
            .await
            .unwrap();
        let again = IndividualRepository::save(&registry, &individual("TW-2025-BBBBBB")).await;
        assert!(matches!(again, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_logs_are_listed_newest_first() {
        let registry = InMemoryRegistry::new();
        for location in ["Juba", "Wau", "Bor"] {
            registry
                .append(NewVerificationLog::by_tag(
                    "cow",
                    crate::domain::CallerRole::Mobile,
                    location,
                ))
                .await
                .unwrap();
        }

        let logs = VerificationLogRepository::list(&registry, Some(2)).await.unwrap();
        let locations: Vec<&str> = logs.iter().map(|l| l.location.as_str()).collect();
        assert_eq!(locations, vec!["Bor", "Wau"]);
    }

    #[tokio::test]
    async fn test_delete_cascade_leaves_other_individuals() {
        let registry = InMemoryRegistry::new();
        let gone = individual("TW-2025-CCCCCC");
        let kept = individual("TW-2025-DDDDDD");
        IndividualRepository::save(&registry, &gone).await.unwrap();
        IndividualRepository::save(&registry, &kept).await.unwrap();
        for (cow, hot) in [(&gone, 0), (&gone, 1), (&kept, 2)] {
            registry
                .insert(NewEmbeddingRecord::new(cow.id(), unit_vector(hot), "front"))
                .await
                .unwrap();
        }
        registry
            .append(NewVerificationLog::by_tag(
                gone.id(),
                crate::domain::CallerRole::Admin,
                "Juba",
            ))
            .await
            .unwrap();

        let removed = registry.delete_cascade(gone.id()).await.unwrap();
        assert_eq!(removed.embeddings, 2);
        assert_eq!(removed.verification_logs, 1);
        assert_eq!(removed.transfers, 0);

        assert!(IndividualRepository::find_by_id(&registry, gone.id())
            .await
            .unwrap()
            .is_none());
        assert_eq!(EmbeddingStore::count(&registry).await.unwrap(), 1);
        assert_eq!(registry.count_for(kept.id()).await.unwrap(), 1);
    }
}
