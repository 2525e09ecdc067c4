use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, params_from_iter, Connection, Row};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{
    CallerRole, CascadeDeletion, CattleProfile, DomainError, Individual, IndividualRepository,
    IndividualStatus, NewReport, NewVerificationLog, Owner, OwnershipTransfer, Report,
    ReportFilter, ReportRepository, ReportStatus, ReportType, VerificationLogEntry,
    VerificationLogRepository, VerificationMethod, VerificationOutcome, EMBEDDING_DIMENSIONS,
};

const INDIVIDUAL_COLUMNS: &str = "id, tag, status, owner_name, owner_email, owner_phone, \
     owner_address, owner_national_id, breed, color, age, created_at, transferred_at";

const LOG_COLUMNS: &str =
    "id, individual_id, probe_label, similarity, outcome, method, role, location, created_at";

const REPORT_COLUMNS: &str = "id, reporter_name, reporter_phone, reporter_email, tag, \
     report_type, subject, message, location, status, admin_reply, created_at, updated_at";

/// Creates every registry table, `embeddings` included. Idempotent.
pub(crate) fn initialize_registry_schema(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(&format!(
        r#"
        CREATE SEQUENCE IF NOT EXISTS embedding_id_seq START 1;
        CREATE TABLE IF NOT EXISTS embeddings (
            id BIGINT PRIMARY KEY DEFAULT nextval('embedding_id_seq'),
            individual_id TEXT NOT NULL,
            vector FLOAT[{dims}] NOT NULL,
            label TEXT NOT NULL,
            quality FLOAT NOT NULL,
            is_primary BOOLEAN NOT NULL,
            created_at BIGINT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS embeddings_individual_idx ON embeddings (individual_id);
        CREATE TABLE IF NOT EXISTS individuals (
            id TEXT PRIMARY KEY,
            tag TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL,
            owner_name TEXT NOT NULL,
            owner_email TEXT,
            owner_phone TEXT,
            owner_address TEXT,
            owner_national_id TEXT,
            breed TEXT NOT NULL,
            color TEXT NOT NULL,
            age INTEGER NOT NULL,
            created_at BIGINT NOT NULL,
            transferred_at BIGINT
        );

        CREATE TABLE IF NOT EXISTS ownership_transfers (
            id TEXT PRIMARY KEY,
            individual_id TEXT NOT NULL,
            previous_owner TEXT NOT NULL,
            new_owner TEXT NOT NULL,
            transferred_at BIGINT NOT NULL
        );

        CREATE SEQUENCE IF NOT EXISTS verification_log_id_seq START 1;
        CREATE TABLE IF NOT EXISTS verification_logs (
            id BIGINT PRIMARY KEY DEFAULT nextval('verification_log_id_seq'),
            individual_id TEXT,
            probe_label TEXT NOT NULL,
            similarity FLOAT NOT NULL,
            outcome TEXT NOT NULL,
            method TEXT NOT NULL,
            role TEXT NOT NULL,
            location TEXT NOT NULL,
            created_at BIGINT NOT NULL
        );

        CREATE SEQUENCE IF NOT EXISTS report_id_seq START 1;
        CREATE TABLE IF NOT EXISTS reports (
            id BIGINT PRIMARY KEY DEFAULT nextval('report_id_seq'),
            reporter_name TEXT NOT NULL,
            reporter_phone TEXT,
            reporter_email TEXT,
            tag TEXT,
            report_type TEXT NOT NULL,
            subject TEXT NOT NULL,
            message TEXT NOT NULL,
            location TEXT,
            status TEXT NOT NULL,
            admin_reply TEXT,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        );
        "#,
        dims = EMBEDDING_DIMENSIONS
    ))
    .map_err(|e| DomainError::store(format!("Failed to initialize registry schema: {}", e)))?;

    debug!("DuckDB registry schema initialized");
    Ok(())
}

/// Individuals, ownership history, verification logs and reports in DuckDB.
pub struct DuckdbRegistryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbRegistryRepository {
    pub fn new(db_path: &Path) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::store(format!("Failed to open DuckDB database: {}", e)))?;
        initialize_registry_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Uses a connection already owned by another adapter. DuckDB allows
    /// one write connection per file; the schema must already exist
    /// (`DuckdbEmbeddingStore` creates it).
    pub fn with_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub fn shared_connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    pub fn in_memory() -> Result<Self, DomainError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            DomainError::store(format!("Failed to open DuckDB in-memory DB: {}", e))
        })?;
        initialize_registry_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn find_individual(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<Individual>, DomainError> {
        let conn = self.conn.lock().await;
        let result = conn.query_row(
            &format!(
                "SELECT {} FROM individuals WHERE {} = ?",
                INDIVIDUAL_COLUMNS, column
            ),
            params![value],
            IndividualRow::read,
        );

        match result {
            Ok(row) => Ok(Some(row.into_individual()?)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DomainError::store(format!(
                "Failed to find individual: {}",
                e
            ))),
        }
    }

    async fn count_where(&self, sql: &str, values: Vec<String>) -> Result<u64, DomainError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row(sql, params_from_iter(values), |row| row.get(0))
            .map_err(|e| DomainError::store(format!("Failed to count rows: {}", e)))?;
        Ok(count as u64)
    }
}

struct IndividualRow {
    id: String,
    tag: String,
    status: String,
    owner_name: String,
    owner_email: Option<String>,
    owner_phone: Option<String>,
    owner_address: Option<String>,
    owner_national_id: Option<String>,
    breed: String,
    color: String,
    age: i64,
    created_at: i64,
    transferred_at: Option<i64>,
}

impl IndividualRow {
    fn read(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            tag: row.get(1)?,
            status: row.get(2)?,
            owner_name: row.get(3)?,
            owner_email: row.get(4)?,
            owner_phone: row.get(5)?,
            owner_address: row.get(6)?,
            owner_national_id: row.get(7)?,
            breed: row.get(8)?,
            color: row.get(9)?,
            age: row.get(10)?,
            created_at: row.get(11)?,
            transferred_at: row.get(12)?,
        })
    }

    fn into_individual(self) -> Result<Individual, DomainError> {
        let owner = Owner {
            full_name: self.owner_name,
            email: self.owner_email,
            phone: self.owner_phone,
            address: self.owner_address,
            national_id: self.owner_national_id,
        };
        Ok(Individual::reconstitute(
            self.id,
            self.tag,
            IndividualStatus::parse(&self.status)?,
            owner,
            CattleProfile::new(self.breed, self.color, self.age.max(0) as u32),
            self.created_at,
            self.transferred_at,
        ))
    }
}

struct LogRow {
    id: i64,
    individual_id: Option<String>,
    probe_label: String,
    similarity: f32,
    outcome: String,
    method: String,
    role: String,
    location: String,
    created_at: i64,
}

impl LogRow {
    fn read(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            individual_id: row.get(1)?,
            probe_label: row.get(2)?,
            similarity: row.get(3)?,
            outcome: row.get(4)?,
            method: row.get(5)?,
            role: row.get(6)?,
            location: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn into_entry(self) -> Result<VerificationLogEntry, DomainError> {
        Ok(VerificationLogEntry {
            id: self.id,
            individual_id: self.individual_id,
            probe_label: self.probe_label,
            similarity: self.similarity,
            outcome: VerificationOutcome::parse(&self.outcome)?,
            method: VerificationMethod::parse(&self.method)?,
            role: CallerRole::parse(&self.role)?,
            location: self.location,
            created_at: self.created_at,
        })
    }
}

struct ReportRow {
    id: i64,
    reporter_name: String,
    reporter_phone: Option<String>,
    reporter_email: Option<String>,
    tag: Option<String>,
    report_type: String,
    subject: String,
    message: String,
    location: Option<String>,
    status: String,
    admin_reply: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl ReportRow {
    fn read(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            reporter_name: row.get(1)?,
            reporter_phone: row.get(2)?,
            reporter_email: row.get(3)?,
            tag: row.get(4)?,
            report_type: row.get(5)?,
            subject: row.get(6)?,
            message: row.get(7)?,
            location: row.get(8)?,
            status: row.get(9)?,
            admin_reply: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    fn into_report(self) -> Result<Report, DomainError> {
        Ok(Report {
            id: self.id,
            reporter_name: self.reporter_name,
            reporter_phone: self.reporter_phone,
            reporter_email: self.reporter_email,
            tag: self.tag,
            report_type: ReportType::parse(&self.report_type)?,
            subject: self.subject,
            message: self.message,
            location: self.location,
            status: ReportStatus::parse(&self.status)?,
            admin_reply: self.admin_reply,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn owner_to_json(owner: &Owner) -> Result<String, DomainError> {
    serde_json::to_string(owner)
        .map_err(|e| DomainError::internal(format!("Failed to serialize owner: {}", e)))
}

fn owner_from_json(json: &str) -> Result<Owner, DomainError> {
    serde_json::from_str(json)
        .map_err(|e| DomainError::store(format!("Corrupt owner record: {}", e)))
}

fn report_filter_clause(filter: &ReportFilter) -> (String, Vec<String>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();
    if let Some(status) = filter.status {
        clauses.push("status = ?");
        values.push(status.as_str().to_string());
    }
    if let Some(report_type) = filter.report_type {
        clauses.push("report_type = ?");
        values.push(report_type.as_str().to_string());
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

#[async_trait]
impl IndividualRepository for DuckdbRegistryRepository {
    async fn save(&self, individual: &Individual) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        let owner = individual.owner();
        let profile = individual.profile();

        conn.execute(
            &format!(
                "INSERT INTO individuals ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                INDIVIDUAL_COLUMNS
            ),
            params![
                individual.id(),
                individual.tag(),
                individual.status().as_str(),
                owner.full_name,
                owner.email,
                owner.phone,
                owner.address,
                owner.national_id,
                profile.breed,
                profile.color,
                profile.age as i64,
                individual.created_at(),
                individual.transferred_at(),
            ],
        )
        .map_err(|e| {
            DomainError::store(format!(
                "Failed to save individual {}: {}",
                individual.tag(),
                e
            ))
        })?;

        debug!("Saved individual {} to DuckDB", individual.tag());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Individual>, DomainError> {
        self.find_individual("id", id).await
    }

    async fn find_by_tag(&self, tag: &str) -> Result<Option<Individual>, DomainError> {
        self.find_individual("tag", tag).await
    }

    async fn list(&self) -> Result<Vec<Individual>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM individuals ORDER BY tag",
                INDIVIDUAL_COLUMNS
            ))
            .map_err(|e| DomainError::store(format!("Failed to prepare query: {}", e)))?;
        let rows = stmt
            .query_map([], IndividualRow::read)
            .map_err(|e| DomainError::store(format!("Failed to list individuals: {}", e)))?;

        let mut individuals = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DomainError::store(format!("Failed to read row: {}", e)))?;
            individuals.push(row.into_individual()?);
        }
        Ok(individuals)
    }

    async fn apply_transfer(
        &self,
        individual: &Individual,
        transfer: &OwnershipTransfer,
    ) -> Result<(), DomainError> {
        let previous_owner = owner_to_json(&transfer.previous_owner)?;
        let new_owner = owner_to_json(&transfer.new_owner)?;
        let owner = individual.owner();

        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::store(format!("Failed to begin transaction: {}", e)))?;

        let updated = tx
            .execute(
                "UPDATE individuals SET status = ?, owner_name = ?, owner_email = ?, \
                 owner_phone = ?, owner_address = ?, owner_national_id = ?, transferred_at = ? \
                 WHERE id = ?",
                params![
                    individual.status().as_str(),
                    owner.full_name,
                    owner.email,
                    owner.phone,
                    owner.address,
                    owner.national_id,
                    individual.transferred_at(),
                    individual.id(),
                ],
            )
            .map_err(|e| DomainError::store(format!("Failed to update individual: {}", e)))?;
        if updated == 0 {
            return Err(DomainError::not_found(format!(
                "Individual not found: {}",
                individual.id()
            )));
        }

        tx.execute(
            "INSERT INTO ownership_transfers (id, individual_id, previous_owner, new_owner, transferred_at) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                transfer.id,
                transfer.individual_id,
                previous_owner,
                new_owner,
                transfer.transferred_at,
            ],
        )
        .map_err(|e| DomainError::store(format!("Failed to record transfer: {}", e)))?;

        tx.commit()
            .map_err(|e| DomainError::store(format!("Failed to commit: {}", e)))?;
        Ok(())
    }

    async fn transfers_for(&self, id: &str) -> Result<Vec<OwnershipTransfer>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT id, individual_id, previous_owner, new_owner, transferred_at \
                 FROM ownership_transfers WHERE individual_id = ? ORDER BY transferred_at, id",
            )
            .map_err(|e| DomainError::store(format!("Failed to prepare query: {}", e)))?;
        let rows = stmt
            .query_map(params![id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })
            .map_err(|e| DomainError::store(format!("Failed to list transfers: {}", e)))?;

        let mut transfers = Vec::new();
        for row in rows {
            let (id, individual_id, previous, new, transferred_at) =
                row.map_err(|e| DomainError::store(format!("Failed to read row: {}", e)))?;
            transfers.push(OwnershipTransfer {
                id,
                individual_id,
                previous_owner: owner_from_json(&previous)?,
                new_owner: owner_from_json(&new)?,
                transferred_at,
            });
        }
        Ok(transfers)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::store(format!("Failed to begin transaction: {}", e)))?;

        tx.execute(
            "DELETE FROM ownership_transfers WHERE individual_id = ?",
            params![id],
        )
        .map_err(|e| DomainError::store(format!("Failed to delete transfers: {}", e)))?;
        tx.execute("DELETE FROM individuals WHERE id = ?", params![id])
            .map_err(|e| DomainError::store(format!("Failed to delete individual: {}", e)))?;

        tx.commit()
            .map_err(|e| DomainError::store(format!("Failed to commit: {}", e)))?;
        Ok(())
    }

    async fn delete_cascade(&self, id: &str) -> Result<CascadeDeletion, DomainError> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::store(format!("Failed to begin transaction: {}", e)))?;

        let embeddings = tx
            .execute("DELETE FROM embeddings WHERE individual_id = ?", params![id])
            .map_err(|e| DomainError::store(format!("Failed to delete embeddings: {}", e)))?;
        let verification_logs = tx
            .execute(
                "DELETE FROM verification_logs WHERE individual_id = ?",
                params![id],
            )
            .map_err(|e| DomainError::store(format!("Failed to delete verification logs: {}", e)))?;
        let transfers = tx
            .execute(
                "DELETE FROM ownership_transfers WHERE individual_id = ?",
                params![id],
            )
            .map_err(|e| DomainError::store(format!("Failed to delete transfers: {}", e)))?;
        tx.execute("DELETE FROM individuals WHERE id = ?", params![id])
            .map_err(|e| DomainError::store(format!("Failed to delete individual: {}", e)))?;

        tx.commit()
            .map_err(|e| DomainError::store(format!("Failed to commit: {}", e)))?;

        debug!(
            "Cascade delete of {}: {} embeddings, {} logs, {} transfers",
            id, embeddings, verification_logs, transfers
        );
        Ok(CascadeDeletion {
            embeddings: embeddings as u64,
            verification_logs: verification_logs as u64,
            transfers: transfers as u64,
        })
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.count_where("SELECT COUNT(*) FROM individuals", Vec::new())
            .await
    }
}

#[async_trait]
impl VerificationLogRepository for DuckdbRegistryRepository {
    async fn append(&self, entry: NewVerificationLog) -> Result<VerificationLogEntry, DomainError> {
        let conn = self.conn.lock().await;
        let id: i64 = conn
            .query_row(
                "SELECT nextval('verification_log_id_seq')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::store(format!("Failed to allocate log id: {}", e)))?;

        let entry = entry.into_entry(id);
        conn.execute(
            &format!(
                "INSERT INTO verification_logs ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                LOG_COLUMNS
            ),
            params![
                entry.id,
                entry.individual_id,
                entry.probe_label,
                entry.similarity,
                entry.outcome.as_str(),
                entry.method.as_str(),
                entry.role.as_str(),
                entry.location,
                entry.created_at,
            ],
        )
        .map_err(|e| DomainError::store(format!("Failed to append verification log: {}", e)))?;

        Ok(entry)
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<VerificationLogEntry>, DomainError> {
        let limit = limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(i64::MAX);
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM verification_logs ORDER BY created_at DESC, id DESC LIMIT ?",
                LOG_COLUMNS
            ))
            .map_err(|e| DomainError::store(format!("Failed to prepare query: {}", e)))?;
        let rows = stmt
            .query_map(params![limit], LogRow::read)
            .map_err(|e| DomainError::store(format!("Failed to list verification logs: {}", e)))?;

        let mut entries = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DomainError::store(format!("Failed to read row: {}", e)))?;
            entries.push(row.into_entry()?);
        }
        Ok(entries)
    }

    async fn list_for_individual(
        &self,
        individual_id: &str,
    ) -> Result<Vec<VerificationLogEntry>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM verification_logs WHERE individual_id = ? \
                 ORDER BY created_at DESC, id DESC",
                LOG_COLUMNS
            ))
            .map_err(|e| DomainError::store(format!("Failed to prepare query: {}", e)))?;
        let rows = stmt
            .query_map(params![individual_id], LogRow::read)
            .map_err(|e| DomainError::store(format!("Failed to list verification logs: {}", e)))?;

        let mut entries = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DomainError::store(format!("Failed to read row: {}", e)))?;
            entries.push(row.into_entry()?);
        }
        Ok(entries)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.count_where("SELECT COUNT(*) FROM verification_logs", Vec::new())
            .await
    }

    async fn count_by_outcome(&self, outcome: VerificationOutcome) -> Result<u64, DomainError> {
        self.count_where(
            "SELECT COUNT(*) FROM verification_logs WHERE outcome = ?",
            vec![outcome.as_str().to_string()],
        )
        .await
    }
}

#[async_trait]
impl ReportRepository for DuckdbRegistryRepository {
    async fn submit(&self, report: NewReport) -> Result<Report, DomainError> {
        let conn = self.conn.lock().await;
        let id: i64 = conn
            .query_row("SELECT nextval('report_id_seq')", [], |row| row.get(0))
            .map_err(|e| DomainError::store(format!("Failed to allocate report id: {}", e)))?;

        let report = report.into_report(id);
        conn.execute(
            &format!(
                "INSERT INTO reports ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                REPORT_COLUMNS
            ),
            params![
                report.id,
                report.reporter_name,
                report.reporter_phone,
                report.reporter_email,
                report.tag,
                report.report_type.as_str(),
                report.subject,
                report.message,
                report.location,
                report.status.as_str(),
                report.admin_reply,
                report.created_at,
                report.updated_at,
            ],
        )
        .map_err(|e| DomainError::store(format!("Failed to save report: {}", e)))?;

        Ok(report)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Report>, DomainError> {
        let conn = self.conn.lock().await;
        let result = conn.query_row(
            &format!("SELECT {} FROM reports WHERE id = ?", REPORT_COLUMNS),
            params![id],
            ReportRow::read,
        );

        match result {
            Ok(row) => Ok(Some(row.into_report()?)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DomainError::store(format!("Failed to find report: {}", e))),
        }
    }

    async fn list(&self, filter: ReportFilter) -> Result<Vec<Report>, DomainError> {
        let (clause, values) = report_filter_clause(&filter);
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM reports{} ORDER BY created_at DESC, id DESC",
                REPORT_COLUMNS, clause
            ))
            .map_err(|e| DomainError::store(format!("Failed to prepare query: {}", e)))?;
        let rows = stmt
            .query_map(params_from_iter(values), ReportRow::read)
            .map_err(|e| DomainError::store(format!("Failed to list reports: {}", e)))?;

        let mut reports = Vec::new();
        for row in rows {
            let row = row.map_err(|e| DomainError::store(format!("Failed to read row: {}", e)))?;
            reports.push(row.into_report()?);
        }
        Ok(reports)
    }

    async fn update(&self, report: &Report) -> Result<(), DomainError> {
        let conn = self.conn.lock().await;
        let updated = conn
            .execute(
                "UPDATE reports SET status = ?, admin_reply = ?, updated_at = ? WHERE id = ?",
                params![
                    report.status.as_str(),
                    report.admin_reply,
                    report.updated_at,
                    report.id,
                ],
            )
            .map_err(|e| DomainError::store(format!("Failed to update report: {}", e)))?;

        if updated == 0 {
            return Err(DomainError::not_found(format!(
                "Report not found: {}",
                report.id
            )));
        }
        Ok(())
    }

    async fn count(&self, filter: ReportFilter) -> Result<u64, DomainError> {
        let (clause, values) = report_filter_clause(&filter);
        self.count_where(&format!("SELECT COUNT(*) FROM reports{}", clause), values)
            .await
    }
}
