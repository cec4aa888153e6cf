//! SQL statement classification by prefix scan.
//!
//! The classifier looks at the first significant token only. That is enough
//! to decide whether a statement is transaction control (intercepted, never
//! forwarded), a write (affects row counters and `last_insert_rowid`), or a
//! read. It is deliberately not a SQL parser.

/// Coarse statement classification derived from the leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtKind {
    /// `BEGIN`/`COMMIT`/`ROLLBACK`/`SAVEPOINT`/`RELEASE`. The backend runs in
    /// implicit autocommit, so these are answered as no-ops without touching it.
    TxnControl,
    /// `INSERT`: a write that additionally populates `last_insert_rowid`.
    Insert,
    /// `UPDATE`/`DELETE`/`CREATE`/`DROP`/`ALTER`.
    Write,
    /// Everything else.
    Read,
}

impl StmtKind {
    /// Whether the statement counts as a write for result metadata.
    #[inline]
    pub fn is_write(self) -> bool {
        matches!(self, StmtKind::Insert | StmtKind::Write)
    }
}

/// Classify a statement by its first significant token, case-insensitively.
pub fn classify(sql: &str) -> StmtKind {
    let token = first_token(sql);
    if token.eq_ignore_ascii_case("BEGIN")
        || token.eq_ignore_ascii_case("COMMIT")
        || token.eq_ignore_ascii_case("ROLLBACK")
        || token.eq_ignore_ascii_case("SAVEPOINT")
        || token.eq_ignore_ascii_case("RELEASE")
    {
        StmtKind::TxnControl
    } else if token.eq_ignore_ascii_case("INSERT") {
        StmtKind::Insert
    } else if token.eq_ignore_ascii_case("UPDATE")
        || token.eq_ignore_ascii_case("DELETE")
        || token.eq_ignore_ascii_case("CREATE")
        || token.eq_ignore_ascii_case("DROP")
        || token.eq_ignore_ascii_case("ALTER")
    {
        StmtKind::Write
    } else {
        StmtKind::Read
    }
}

/// Whether the statement is an `EXPLAIN` (or `EXPLAIN QUERY PLAN`) form.
pub fn is_explain(sql: &str) -> bool {
    first_token(sql).eq_ignore_ascii_case("EXPLAIN")
}

/// Extract the first token, skipping whitespace and SQL comments.
fn first_token(sql: &str) -> &str {
    let mut rest = sql;
    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map(|(_, tail)| tail).unwrap_or("");
        } else if let Some(after) = rest.strip_prefix("/*") {
            match after.split_once("*/") {
                Some((_, tail)) => rest = tail,
                None => return "",
            }
        } else {
            break;
        }
    }
    let end = rest
        .find(|c: char| c.is_whitespace() || c == ';' || c == '(')
        .unwrap_or(rest.len());
    &rest[..end]
}
