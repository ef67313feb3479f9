//! Estimate persistence.
//!
//! [`EstimateStore`] is the append-only contract the HTTP layer works
//! against. Two implementations exist: [`Database`] (SQLite) and
//! [`MemoryStore`] (process-local, lost on exit).

mod memory;
mod schema;

pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::Connection;

use crate::models::*;

/// Append-only storage for estimate snapshots.
///
/// Implementations assign ids that strictly increase and are never reused,
/// and they make "assign id + insert" a single atomic step. Reads never
/// observe a partially inserted record.
pub trait EstimateStore: Send + Sync {
    /// Persist a new estimate, stamping its id and creation time.
    fn create_estimate(&self, input: NewEstimate) -> Result<Estimate>;

    fn get_estimate(&self, id: i64) -> Result<Option<Estimate>>;

    /// All estimates, most recently created first. Ties on `created_at` are
    /// broken by id, highest first.
    fn get_all_estimates(&self) -> Result<Vec<Estimate>>;
}

/// Creation timestamp truncated to the precision the SQLite store keeps,
/// so a record reads back exactly as it was returned from `create`.
pub(crate) fn creation_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "project-estimator")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("estimates.db"))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        schema::run_migrations(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))
    }
}

const ESTIMATE_COLUMNS: &str = "id, project_name, project_type, selected_features,
    tech_frontend, tech_backend, tech_database, tech_deployment,
    complexity, hourly_rate, total_hours, total_cost, created_at";

impl EstimateStore for Database {
    fn create_estimate(&self, input: NewEstimate) -> Result<Estimate> {
        let selected_features = serde_json::to_string(&input.selected_features)?;
        let hourly_rate = to_sql_int(input.hourly_rate, "hourly_rate")?;
        let total_hours = to_sql_int(input.total_hours, "total_hours")?;
        let total_cost = to_sql_int(input.total_cost, "total_cost")?;

        // Held across insert and rowid read so ids come back in insert order.
        let conn = self.lock()?;
        let now = creation_timestamp();

        conn.execute(
            "INSERT INTO estimates (project_name, project_type, selected_features,
                tech_frontend, tech_backend, tech_database, tech_deployment,
                complexity, hourly_rate, total_hours, total_cost, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                &input.project_name,
                &input.project_type,
                &selected_features,
                &input.tech_stack.frontend,
                &input.tech_stack.backend,
                &input.tech_stack.database,
                &input.tech_stack.deployment,
                input.complexity.as_str(),
                hourly_rate,
                total_hours,
                total_cost,
                format_datetime(&now),
            ),
        )?;
        let id = conn.last_insert_rowid();

        tracing::info!(id, project = %input.project_name, "Created estimate");

        Ok(Estimate {
            id,
            data: input,
            created_at: now,
        })
    }

    fn get_estimate(&self, id: i64) -> Result<Option<Estimate>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM estimates WHERE id = ?",
            ESTIMATE_COLUMNS
        ))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(estimate_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    fn get_all_estimates(&self) -> Result<Vec<Estimate>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM estimates ORDER BY created_at DESC, id DESC",
            ESTIMATE_COLUMNS
        ))?;

        let estimates = stmt
            .query_map([], estimate_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(estimates)
    }
}

fn estimate_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Estimate> {
    Ok(Estimate {
        id: row.get(0)?,
        data: NewEstimate {
            project_name: row.get(1)?,
            project_type: row.get(2)?,
            selected_features: parse_string_list(3, row.get(3)?)?,
            tech_stack: TechStack {
                frontend: row.get(4)?,
                backend: row.get(5)?,
                database: row.get(6)?,
                deployment: row.get(7)?,
            },
            complexity: parse_complexity(8, row.get(8)?)?,
            hourly_rate: parse_amount(9, row.get(9)?)?,
            total_hours: parse_amount(10, row.get(10)?)?,
            total_cost: parse_amount(11, row.get(11)?)?,
        },
        created_at: parse_datetime(12, row.get(12)?)?,
    })
}

/// A stored value that no longer decodes into its column's type.
fn corrupt(
    column: usize,
    column_type: Type,
    error: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, column_type, error.into())
}

fn to_sql_int(value: u64, field: &str) -> Result<i64> {
    i64::try_from(value).with_context(|| format!("{} is too large to store", field))
}

/// Fixed-width RFC 3339 so lexical order in SQLite matches time order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(column: usize, s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(column, Type::Text, e))
}

fn parse_string_list(column: usize, s: String) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(&s).map_err(|e| corrupt(column, Type::Text, e))
}

fn parse_complexity(column: usize, s: String) -> rusqlite::Result<Complexity> {
    Complexity::from_str(&s)
        .ok_or_else(|| corrupt(column, Type::Text, format!("unknown complexity '{}'", s)))
}

fn parse_amount(column: usize, v: i64) -> rusqlite::Result<u64> {
    u64::try_from(v).map_err(|e| corrupt(column, Type::Integer, e))
}
