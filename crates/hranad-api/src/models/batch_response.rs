//! V1 batch response model
//!
//! Each executed statement produces one entry; values use the v1 encoding
//! (raw scalars, blobs as `{"base64": …}`).

use hranad_commons::value::encode_v1;
use hranad_core::executor::StmtResult;
use serde::Serialize;

/// One entry in the v1 response array.
#[derive(Debug, Serialize)]
pub struct V1BatchEntry {
    pub results: V1ResultSet,
}

#[derive(Debug, Serialize)]
pub struct V1ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub rows_read: u64,
    pub rows_written: u64,
    pub query_duration_ms: f64,
}

impl V1BatchEntry {
    pub fn from_result(result: &StmtResult) -> Self {
        Self {
            results: V1ResultSet {
                columns: result.cols.iter().map(|col| col.name.clone()).collect(),
                rows: result.rows.iter().map(|row| row.iter().map(encode_v1).collect()).collect(),
                rows_read: result.rows_read,
                rows_written: result.rows_written,
                query_duration_ms: result.query_duration_ms,
            },
        }
    }
}
