//! Query executor boundary.
//!
//! The protocol server owns no SQL semantics of its own; everything executes
//! through [`SqlBackend`]. The trait keeps the wire layer testable against
//! fakes and keeps rusqlite types out of every other crate.

mod sqlite;

pub use sqlite::SqliteBackend;

use crate::error::Result;
use hranad_commons::Value;

/// A result-set column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Declared type from the table schema, when the column has one.
    /// Expression columns (e.g. `SELECT 1`) have none.
    pub decltype: Option<String>,
}

/// Arguments for one statement, already decoded from the wire.
///
/// Positional and named arguments are mutually exclusive on the wire; when a
/// client sends both, positional wins (the named ones are ignored by the
/// executor before they reach a backend).
#[derive(Debug, Clone)]
pub enum BindArgs<'a> {
    Positional(&'a [Value]),
    Named(&'a [(String, Value)]),
}

/// Raw outcome of executing one statement.
#[derive(Debug, Clone)]
pub struct ExecOutcome {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
    /// Rows changed by the statement, when the backend can report it.
    /// Backends that cannot count leave `None` and the executor falls back
    /// to 1 for writes.
    pub changes: Option<u64>,
    /// Rowid of the most recent insert on this connection, when reported.
    pub last_insert_rowid: Option<i64>,
}

/// Result of preparing (without executing) one statement.
#[derive(Debug, Clone)]
pub struct StmtDescription {
    /// One entry per placeholder, in bind order. Positional placeholders
    /// (`?`) have no name.
    pub params: Vec<Option<String>>,
    pub columns: Vec<Column>,
}

/// The embedded query executor the protocol server runs against.
///
/// Implementations are synchronous; the caller serializes access. A backend
/// holds no protocol state: streams, batons, and stored SQL never reach it.
pub trait SqlBackend: Send + Sync {
    /// Prepare and execute one statement, binding `args` first.
    fn exec(&self, sql: &str, args: BindArgs<'_>) -> Result<ExecOutcome>;

    /// Execute a multi-statement script. No rows are returned.
    fn exec_script(&self, sql: &str) -> Result<()>;

    /// Prepare a statement and report its parameters and columns without
    /// executing it.
    fn describe(&self, sql: &str) -> Result<StmtDescription>;
}
