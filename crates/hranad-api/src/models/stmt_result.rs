//! Version-specific encoding of a statement result.

use hranad_commons::value::encode_v2;
use hranad_commons::ProtocolVersion;
use hranad_core::executor::StmtResult;
use serde_json::json;

/// Encode a [`StmtResult`] in the Hrana result shape for v2 or v3.
///
/// Both versions carry `cols`, `rows`, `affected_row_count`, and
/// `last_insert_rowid` (as a decimal string, to survive JSON number
/// parsing). Only v3 adds the row counters and timing.
pub fn stmt_result_to_json(result: &StmtResult, version: ProtocolVersion) -> serde_json::Value {
    let cols: Vec<serde_json::Value> = result
        .cols
        .iter()
        .map(|col| json!({ "name": col.name, "decltype": col.decltype }))
        .collect();
    let rows: Vec<Vec<serde_json::Value>> =
        result.rows.iter().map(|row| row.iter().map(encode_v2).collect()).collect();

    let mut wire = json!({
        "cols": cols,
        "rows": rows,
        "affected_row_count": result.affected_row_count,
        "last_insert_rowid": result.last_insert_rowid.map(|rowid| rowid.to_string()),
    });

    if version.has_stmt_metadata() {
        wire["rows_read"] = json!(result.rows_read);
        wire["rows_written"] = json!(result.rows_written);
        wire["query_duration_ms"] = json!(result.query_duration_ms);
    }

    wire
}
