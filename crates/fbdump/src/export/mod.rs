//! Export driver - walks the catalog and writes SQL for every table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{debug, error, info, warn};

use crate::config::ExportConfig;
use crate::core::{coerce_with, Connection, ConnectionGuard, Relation};
use crate::error::Result;
use crate::source;
use crate::statement::{build_create_table, build_insert};

/// Exports every user table over one connection.
///
/// The exporter owns the connection for the whole run and releases it exactly
/// once, whether the run finishes, fails or panics.
pub struct Exporter<C: Connection> {
    conn: ConnectionGuard<C>,
    config: ExportConfig,
    progress: bool,
}

/// Result of an export run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Unique run identifier.
    pub run_id: String,

    /// Final status: "completed" or "completed_with_errors".
    pub status: String,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// When the export started.
    pub started_at: DateTime<Utc>,

    /// When the export completed.
    pub completed_at: DateTime<Utc>,

    /// Tables selected for export.
    pub tables_total: usize,

    /// Tables whose rows were written.
    pub tables_exported: usize,

    /// Tables skipped because they had no rows.
    pub tables_empty: usize,

    /// Tables that failed.
    pub tables_failed: usize,

    /// Total rows written as INSERT statements.
    pub rows_exported: usize,

    /// Total statements written.
    pub statements_written: usize,

    /// Names of failed tables (the table list itself shows as `RDB$RELATIONS`).
    pub failed_tables: Vec<String>,
}

/// Progress line emitted after each table when progress reporting is on.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpdate<'a> {
    pub table: &'a str,
    pub index: usize,
    pub total: usize,
    pub status: &'static str,
    pub rows: usize,
}

/// What happened to one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableOutcome {
    Exported { rows: usize, statements: usize },
    Empty { statements: usize },
}

impl<C: Connection> Exporter<C> {
    /// Create an exporter that takes ownership of an open connection.
    pub fn new(conn: C, config: ExportConfig) -> Self {
        Self {
            conn: ConnectionGuard::new(conn),
            config,
            progress: false,
        }
    }

    /// Enable JSON progress lines on stderr.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    /// Run the export, writing one statement per line to `out`.
    ///
    /// Catalog and dump failures are logged and the run moves on to the next
    /// table. Only failures writing to `out` abort the run.
    pub async fn run<W: Write>(mut self, out: &mut W) -> Result<ExportSummary> {
        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        info!("Starting export run: {}", run_id);

        let mut failed_tables = Vec::new();

        let tables: Vec<Relation> = match source::list_tables(&mut *self.conn).await {
            Ok(tables) => tables
                .into_iter()
                .filter(|t| self.config.wants_table(&t.name))
                .collect(),
            Err(e) => {
                error!("Failed to fetch tables from database - {}", e);
                failed_tables.push(source::LIST_TABLES_LABEL.to_string());
                Vec::new()
            }
        };

        info!("Found {} tables to export", tables.len());

        let total = tables.len();
        let mut tables_exported = 0;
        let mut tables_empty = 0;
        let mut rows_exported = 0;
        let mut statements_written = 0;

        for (idx, table) in tables.iter().enumerate() {
            let (status, rows) = match self.export_table(table, out).await {
                Ok(TableOutcome::Exported { rows, statements }) => {
                    tables_exported += 1;
                    rows_exported += rows;
                    statements_written += statements;
                    ("exported", rows)
                }
                Ok(TableOutcome::Empty { statements }) => {
                    tables_empty += 1;
                    statements_written += statements;
                    ("empty", 0)
                }
                Err(e) if !e.is_fatal() => {
                    error!("{}", e);
                    failed_tables.push(table.name.clone());
                    ("failed", 0)
                }
                Err(e) => return Err(e),
            };

            info!("[{}/{}] {}: {} ({} rows)", idx + 1, total, table, status, rows);
            self.report_progress(ProgressUpdate {
                table: &table.name,
                index: idx + 1,
                total,
                status,
                rows,
            });
        }

        out.flush()?;

        if let Err(e) = self.conn.close() {
            warn!("Failed to close connection cleanly: {}", e);
        }

        let completed_at = Utc::now();
        let duration_seconds = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;

        let summary = ExportSummary {
            run_id,
            status: if failed_tables.is_empty() {
                "completed".to_string()
            } else {
                "completed_with_errors".to_string()
            },
            duration_seconds,
            started_at,
            completed_at,
            tables_total: total,
            tables_exported,
            tables_empty,
            tables_failed: failed_tables.len(),
            rows_exported,
            statements_written,
            failed_tables,
        };

        info!(
            "Export {}: {}/{} tables, {} rows, {} statements in {:.1}s",
            summary.status,
            summary.tables_exported,
            summary.tables_total,
            summary.rows_exported,
            summary.statements_written,
            summary.duration_seconds
        );

        Ok(summary)
    }

    /// Export a single table. Nothing is written unless the whole table was
    /// read and described successfully.
    async fn export_table<W: Write>(&mut self, table: &Relation, out: &mut W) -> Result<TableOutcome> {
        let rows = source::fetch_rows(&mut *self.conn, table).await?;

        if rows.is_empty() {
            if !self.config.include_empty_tables {
                warn!("Skipping empty table {}", table);
                return Ok(TableOutcome::Empty { statements: 0 });
            }
            debug!("{} has no rows, writing schema only", table);
            let columns = source::describe_table(&mut *self.conn, table).await?;
            writeln!(out, "{}", build_create_table(&table.name, &columns))?;
            return Ok(TableOutcome::Empty { statements: 1 });
        }

        let columns = source::describe_table(&mut *self.conn, table).await?;
        let create = build_create_table(&table.name, &columns);

        let row_count = rows.len();
        let mut inserts = Vec::with_capacity(row_count);
        for row in rows {
            let values: Vec<_> = source::decode_row(table, row, &columns)?
                .into_iter()
                .map(|v| coerce_with(v, self.config.null_policy))
                .collect();
            inserts.push(build_insert(&table.name, &values));
        }

        writeln!(out, "{}", create)?;
        for insert in &inserts {
            writeln!(out, "{}", insert)?;
        }
        debug!("{}: wrote {} statements", table, inserts.len() + 1);

        Ok(TableOutcome::Exported {
            rows: row_count,
            statements: inserts.len() + 1,
        })
    }

    fn report_progress(&self, update: ProgressUpdate<'_>) {
        if !self.progress {
            return;
        }
        match serde_json::to_string(&update) {
            Ok(line) => eprintln!("{}", line),
            Err(e) => debug!("Failed to serialize progress update: {}", e),
        }
    }
}

impl ExportSummary {
    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
