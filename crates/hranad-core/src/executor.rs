//! Statement executor.
//!
//! Single entry point between the wire handlers and the backend: resolves
//! what to do with a statement (intercept, execute, describe, script),
//! measures wall time, and assembles the metadata every protocol version is
//! built from.

use crate::backend::{BindArgs, Column, SqlBackend};
use crate::error::Result;
use crate::statement::{classify, is_explain, StmtKind};
use hranad_commons::Value;
use std::sync::Arc;
use std::time::Instant;

/// Decoded arguments for one statement.
#[derive(Debug, Clone, Default)]
pub struct StmtArgs {
    pub positional: Vec<Value>,
    pub named: Vec<(String, Value)>,
}

impl StmtArgs {
    fn as_bind_args(&self) -> BindArgs<'_> {
        // Positional wins when a client sends both.
        if !self.positional.is_empty() || self.named.is_empty() {
            BindArgs::Positional(&self.positional)
        } else {
            BindArgs::Named(&self.named)
        }
    }
}

/// Structured output of executing one statement.
///
/// Carries every field any protocol version can ask for; the wire encoders
/// in hranad-api decide which fields each version actually serializes.
#[derive(Debug, Clone)]
pub struct StmtResult {
    pub cols: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
    pub affected_row_count: u64,
    /// Set only for a successful `INSERT` that created at least one row.
    pub last_insert_rowid: Option<i64>,
    pub rows_read: u64,
    pub rows_written: u64,
    pub query_duration_ms: f64,
}

/// Outcome of `describe`: prepared-statement shape plus classification.
#[derive(Debug, Clone)]
pub struct StmtDescribe {
    pub params: Vec<Option<String>>,
    pub cols: Vec<Column>,
    pub is_explain: bool,
    pub is_readonly: bool,
}

/// Executes statements against a [`SqlBackend`], intercepting transaction
/// control before it reaches the backend.
pub struct StatementExecutor {
    backend: Arc<dyn SqlBackend>,
}

impl StatementExecutor {
    pub fn new(backend: Arc<dyn SqlBackend>) -> Self {
        Self { backend }
    }

    /// Execute one statement and assemble its result.
    ///
    /// Transaction-control statements (`BEGIN`, `COMMIT`, `ROLLBACK`,
    /// `SAVEPOINT`, `RELEASE`) return an empty result without invoking the
    /// backend, which runs every statement in its own implicit transaction.
    pub fn execute(&self, sql: &str, args: &StmtArgs) -> Result<StmtResult> {
        let kind = classify(sql);
        let started = Instant::now();

        if kind == StmtKind::TxnControl {
            return Ok(StmtResult {
                cols: Vec::new(),
                rows: Vec::new(),
                affected_row_count: 0,
                last_insert_rowid: None,
                rows_read: 0,
                rows_written: 0,
                query_duration_ms: elapsed_ms(started),
            });
        }

        let outcome = self.backend.exec(sql, args.as_bind_args())?;
        let query_duration_ms = elapsed_ms(started);

        let affected_row_count = if kind.is_write() { outcome.changes.unwrap_or(1) } else { 0 };
        let last_insert_rowid = if kind == StmtKind::Insert && affected_row_count > 0 {
            outcome.last_insert_rowid
        } else {
            None
        };

        Ok(StmtResult {
            rows_read: outcome.rows.len() as u64,
            rows_written: if kind.is_write() { 1 } else { 0 },
            cols: outcome.columns,
            rows: outcome.rows,
            affected_row_count,
            last_insert_rowid,
            query_duration_ms,
        })
    }

    /// Execute a multi-statement script (the `sequence` stream request).
    pub fn run_script(&self, sql: &str) -> Result<()> {
        self.backend.exec_script(sql)
    }

    /// Prepare a statement and describe its parameters, columns, and
    /// classification without executing it.
    pub fn describe(&self, sql: &str) -> Result<StmtDescribe> {
        let description = self.backend.describe(sql)?;
        Ok(StmtDescribe {
            params: description.params,
            cols: description.columns,
            is_explain: is_explain(sql),
            is_readonly: !classify(sql).is_write(),
        })
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
