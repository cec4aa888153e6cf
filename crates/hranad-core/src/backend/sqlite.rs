//! rusqlite-backed implementation of [`SqlBackend`].

use super::{BindArgs, Column, ExecOutcome, SqlBackend, StmtDescription};
use crate::error::{BackendError, Result};
use hranad_commons::Value;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Statement};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(100);

/// Embedded SQLite executor.
///
/// The connection is not thread-safe, so it sits behind a mutex and the
/// server executes one statement at a time against it.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open (creating if necessary) a database file.
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;
        let conn = Connection::open_with_flags(path, flags).map_err(into_backend_error)?;
        conn.busy_timeout(busy_timeout).map_err(into_backend_error)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open a private in-memory database. Used by tests and by servers
    /// configured without a data file.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(into_backend_error)?;
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT).map_err(into_backend_error)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

impl SqlBackend for SqliteBackend {
    fn exec(&self, sql: &str, args: BindArgs<'_>) -> Result<ExecOutcome> {
        let conn = self.conn.lock().expect("SQLite connection mutex poisoned");
        let mut stmt = conn.prepare(sql).map_err(into_backend_error)?;
        bind_args(&mut stmt, args)?;

        let columns = collect_columns(&stmt);
        let mut rows_out = Vec::new();
        {
            let mut rows = stmt.raw_query();
            while let Some(row) = rows.next().map_err(into_backend_error)? {
                let mut out = Vec::with_capacity(columns.len());
                for idx in 0..columns.len() {
                    out.push(value_from_sql(row.get_ref(idx).map_err(into_backend_error)?));
                }
                rows_out.push(out);
            }
        }
        drop(stmt);

        Ok(ExecOutcome {
            columns,
            rows: rows_out,
            changes: Some(conn.changes()),
            last_insert_rowid: Some(conn.last_insert_rowid()),
        })
    }

    fn exec_script(&self, sql: &str) -> Result<()> {
        let conn = self.conn.lock().expect("SQLite connection mutex poisoned");
        conn.execute_batch(sql).map_err(into_backend_error)
    }

    fn describe(&self, sql: &str) -> Result<StmtDescription> {
        let conn = self.conn.lock().expect("SQLite connection mutex poisoned");
        let stmt = conn.prepare(sql).map_err(into_backend_error)?;
        let params = (1..=stmt.parameter_count())
            .map(|idx| stmt.parameter_name(idx).map(str::to_string))
            .collect();
        Ok(StmtDescription { params, columns: collect_columns(&stmt) })
    }
}

fn bind_args(stmt: &mut Statement<'_>, args: BindArgs<'_>) -> Result<()> {
    match args {
        BindArgs::Positional(values) => {
            for (idx, value) in values.iter().enumerate() {
                stmt.raw_bind_parameter(idx + 1, to_sql_value(value)).map_err(into_backend_error)?;
            }
        },
        BindArgs::Named(pairs) => {
            for (name, value) in pairs {
                let idx = named_parameter_index(stmt, name)?;
                stmt.raw_bind_parameter(idx, to_sql_value(value)).map_err(into_backend_error)?;
            }
        },
    }
    Ok(())
}

/// Resolve a named argument against the statement's placeholders.
///
/// The wire name may carry any of SQLite's sigils (`:x`, `@x`, `$x`) or none;
/// the placeholder in the SQL may use a different sigil than the client sent.
fn named_parameter_index(stmt: &Statement<'_>, name: &str) -> Result<usize> {
    let bare = name.trim_start_matches(|c| matches!(c, ':' | '@' | '$'));
    for sigil in [':', '@', '$'] {
        let candidate = format!("{}{}", sigil, bare);
        if let Some(idx) = stmt.parameter_index(&candidate).map_err(into_backend_error)? {
            return Ok(idx);
        }
    }
    Err(BackendError::UnknownParameter(name.to_string()))
}

fn collect_columns(stmt: &Statement<'_>) -> Vec<Column> {
    stmt.columns()
        .iter()
        .map(|col| Column {
            name: col.name().to_string(),
            decltype: col.decl_type().map(str::to_string),
        })
        .collect()
}

fn value_from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

fn to_sql_value(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Integer(i) => rusqlite::types::Value::Integer(*i),
        Value::Float(f) => rusqlite::types::Value::Real(*f),
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Blob(bytes) => rusqlite::types::Value::Blob(bytes.clone()),
    }
}

fn into_backend_error(err: rusqlite::Error) -> BackendError {
    BackendError::Execution(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_with_table() -> SqliteBackend {
        let backend = SqliteBackend::open_in_memory().expect("open in-memory db");
        backend
            .exec_script("CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT)")
            .expect("create table");
        backend
    }

    #[test]
    fn test_exec_select_returns_columns_and_rows() {
        let backend = backend_with_table();
        backend
            .exec("INSERT INTO t (v) VALUES (?)", BindArgs::Positional(&[Value::Text("hi".into())]))
            .expect("insert");

        let outcome = backend.exec("SELECT * FROM t", BindArgs::Positional(&[])).expect("select");
        assert_eq!(outcome.columns.len(), 2);
        assert_eq!(outcome.columns[0].name, "id");
        assert_eq!(outcome.columns[0].decltype.as_deref(), Some("INTEGER"));
        assert_eq!(outcome.rows, vec![vec![Value::Integer(1), Value::Text("hi".into())]]);
    }

    #[test]
    fn test_exec_reports_changes_and_rowid() {
        let backend = backend_with_table();
        let outcome = backend
            .exec("INSERT INTO t (v) VALUES (?)", BindArgs::Positional(&[Value::Text("a".into())]))
            .expect("insert");
        assert_eq!(outcome.changes, Some(1));
        assert_eq!(outcome.last_insert_rowid, Some(1));
    }

    #[test]
    fn test_named_binding_accepts_any_sigil() {
        let backend = backend_with_table();
        for wire_name in ["v", ":v", "@v", "$v"] {
            let args = [(wire_name.to_string(), Value::Text("x".into()))];
            backend
                .exec("INSERT INTO t (v) VALUES (:v)", BindArgs::Named(&args))
                .unwrap_or_else(|e| panic!("bind via {}: {}", wire_name, e));
        }
        let outcome = backend.exec("SELECT count(*) FROM t", BindArgs::Positional(&[])).unwrap();
        assert_eq!(outcome.rows[0][0], Value::Integer(4));
    }

    #[test]
    fn test_named_binding_unknown_parameter() {
        let backend = backend_with_table();
        let args = [("nope".to_string(), Value::Integer(1))];
        let err = backend.exec("INSERT INTO t (v) VALUES (:v)", BindArgs::Named(&args)).unwrap_err();
        assert_eq!(err, BackendError::UnknownParameter("nope".to_string()));
    }

    #[test]
    fn test_describe_reports_params_and_columns() {
        let backend = backend_with_table();
        let desc = backend.describe("SELECT id, v FROM t WHERE id = :id AND v = ?").expect("describe");
        assert_eq!(desc.params.len(), 2);
        assert_eq!(desc.params[0].as_deref(), Some(":id"));
        assert_eq!(desc.params[1], None);
        assert_eq!(desc.columns.len(), 2);
        assert_eq!(desc.columns[1].name, "v");
    }

    #[test]
    fn test_exec_error_message_is_preserved() {
        let backend = backend_with_table();
        let err = backend.exec("SELECT notacolumn FROM t", BindArgs::Positional(&[])).unwrap_err();
        assert!(err.to_string().contains("notacolumn"), "got: {}", err);
    }

    #[test]
    fn test_blob_roundtrip_through_backend() {
        let backend = backend_with_table();
        backend.exec_script("CREATE TABLE b (data BLOB)").unwrap();
        let payload = Value::Blob(vec![1, 2, 3, 0, 255]);
        backend
            .exec("INSERT INTO b (data) VALUES (?)", BindArgs::Positional(&[payload.clone()]))
            .unwrap();
        let outcome = backend.exec("SELECT data FROM b", BindArgs::Positional(&[])).unwrap();
        assert_eq!(outcome.rows[0][0], payload);
    }
}
