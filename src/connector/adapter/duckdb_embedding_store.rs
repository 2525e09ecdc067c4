use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection};
use tokio::sync::Mutex;
use tracing::debug;

use super::initialize_registry_schema;
use crate::domain::models::current_timestamp;
use crate::domain::{
    validate_vector, DomainError, EmbeddingRecord, EmbeddingStore, MatchResult,
    NewEmbeddingRecord, EMBEDDING_DIMENSIONS,
};

/// Embedding records in DuckDB. Nearest-neighbour queries are an exact
/// ordered scan; no approximate index is created, so no stored record can
/// be skipped by the duplicate check.
pub struct DuckdbEmbeddingStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbEmbeddingStore {
    pub fn new(path: &Path) -> Result<Self, DomainError> {
        let conn = Connection::open(path)
            .map_err(|e| DomainError::store(format!("Failed to open DuckDB database: {}", e)))?;
        Self::initialize(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, DomainError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            DomainError::store(format!("Failed to open DuckDB in-memory DB: {}", e))
        })?;
        Self::initialize(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Returns a clone of the shared connection Arc so the registry
    /// repository can use the same file.
    pub fn shared_connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn initialize(conn: &Connection) -> Result<(), DomainError> {
        initialize_registry_schema(conn)?;
        debug!("DuckDB embeddings table ready ({} dimensions)", EMBEDDING_DIMENSIONS);
        Ok(())
    }

    /// FLOAT[N] values cannot be bound as parameters, so vectors are
    /// inlined as typed array literals. Only validated vectors get here.
    fn vector_to_array_literal(vector: &[f32]) -> String {
        let mut s = String::with_capacity(vector.len() * 10 + 16);
        s.push('[');
        for (i, v) in vector.iter().enumerate() {
            if i > 0 {
                s.push_str(", ");
            }
            s.push_str(&v.to_string());
        }
        s.push_str(&format!("]::FLOAT[{}]", EMBEDDING_DIMENSIONS));
        s
    }

    fn parse_vector(text: &str) -> Result<Vec<f32>, DomainError> {
        serde_json::from_str(text)
            .map_err(|e| DomainError::store(format!("Corrupt stored vector: {}", e)))
    }
}

#[async_trait]
impl EmbeddingStore for DuckdbEmbeddingStore {
    async fn insert(&self, record: NewEmbeddingRecord) -> Result<i64, DomainError> {
        record.validate()?;
        let array_lit = Self::vector_to_array_literal(record.vector());
        let created_at = current_timestamp();

        let conn = self.conn.lock().await;
        let id: i64 = conn
            .query_row(
                &format!(
                    "INSERT INTO embeddings (individual_id, vector, label, quality, is_primary, created_at) \
                     VALUES (?, {}, ?, ?, ?, ?) RETURNING id",
                    array_lit
                ),
                params![
                    record.individual_id(),
                    record.label(),
                    record.quality(),
                    record.is_primary(),
                    created_at,
                ],
                |row| row.get(0),
            )
            .map_err(|e| {
                DomainError::store(format!(
                    "Failed to insert embedding for {}: {}",
                    record.individual_id(),
                    e
                ))
            })?;

        debug!("Stored embedding record {} ({})", id, record.label());
        Ok(id)
    }

    async fn query_nearest(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<MatchResult>, DomainError> {
        validate_vector(query)?;
        let array_lit = Self::vector_to_array_literal(query);
        let limit = i64::try_from(k).unwrap_or(i64::MAX);

        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT e.id, e.individual_id, COALESCE(i.tag, ''), \
                    array_cosine_similarity(e.vector, {array_lit}) AS similarity \
                 FROM embeddings e \
                 LEFT JOIN individuals i ON i.id = e.individual_id \
                 ORDER BY similarity DESC, e.id ASC \
                 LIMIT ?",
                array_lit = array_lit
            ))
            .map_err(|e| DomainError::store(format!("Failed to prepare nearest query: {}", e)))?;

        let rows = stmt
            .query_map(params![limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f32>(3)?,
                ))
            })
            .map_err(|e| DomainError::store(format!("Failed to run nearest query: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            let (record_id, individual_id, tag, similarity) =
                row.map_err(|e| DomainError::store(format!("Failed to read row: {}", e)))?;
            results.push(MatchResult::new(
                individual_id,
                tag,
                similarity.clamp(-1.0, 1.0),
                record_id,
            ));
        }
        Ok(results)
    }

    async fn delete_individual(&self, individual_id: &str) -> Result<u64, DomainError> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::store(format!("Failed to begin transaction: {}", e)))?;
        let deleted = tx
            .execute(
                "DELETE FROM embeddings WHERE individual_id = ?",
                params![individual_id],
            )
            .map_err(|e| DomainError::store(format!("Failed to delete embeddings: {}", e)))?;
        tx.commit()
            .map_err(|e| DomainError::store(format!("Failed to commit: {}", e)))?;

        debug!("Deleted {} embeddings of {}", deleted, individual_id);
        Ok(deleted as u64)
    }

    async fn records_for(&self, individual_id: &str) -> Result<Vec<EmbeddingRecord>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT id, individual_id, CAST(vector AS VARCHAR), label, quality, is_primary, created_at \
                 FROM embeddings WHERE individual_id = ? ORDER BY id",
            )
            .map_err(|e| DomainError::store(format!("Failed to prepare query: {}", e)))?;
        let rows = stmt
            .query_map(params![individual_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, f32>(4)?,
                    row.get::<_, bool>(5)?,
                    row.get::<_, i64>(6)?,
                ))
            })
            .map_err(|e| DomainError::store(format!("Failed to list embeddings: {}", e)))?;

        let mut records = Vec::new();
        for row in rows {
            let (id, individual_id, vector, label, quality, is_primary, created_at) =
                row.map_err(|e| DomainError::store(format!("Failed to read row: {}", e)))?;
            records.push(EmbeddingRecord::reconstitute(
                id,
                individual_id,
                Self::parse_vector(&vector)?,
                label,
                quality,
                is_primary,
                created_at,
            ));
        }
        Ok(records)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM embeddings", [], |row| row.get(0))
            .map_err(|e| DomainError::store(format!("Failed to count embeddings: {}", e)))?;
        Ok(count as u64)
    }

    async fn count_for(&self, individual_id: &str) -> Result<u64, DomainError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM embeddings WHERE individual_id = ?",
                params![individual_id],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::store(format!("Failed to count embeddings: {}", e)))?;
        Ok(count as u64)
    }
}
