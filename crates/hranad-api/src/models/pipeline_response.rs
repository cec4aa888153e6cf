//! Pipeline response model (v2/v3)
//!
//! # Example Response
//! ```json
//! {
//!   "baton": "9f2c…64 hex chars…",
//!   "base_url": null,
//!   "results": [
//!     {"type": "ok", "response": {"type": "execute", "result": {"cols": [], "rows": []}}},
//!     {"type": "error", "error": {"message": "no such table: t"}}
//!   ]
//! }
//! ```

use serde::Serialize;

/// Body of a pipeline response.
#[derive(Debug, Serialize)]
pub struct PipelineResponseBody {
    /// Fresh baton for the next pipeline, or null when the stream was closed.
    pub baton: Option<String>,

    /// Always null; there is no sticky routing.
    pub base_url: Option<String>,

    /// One entry per request, in request order.
    pub results: Vec<StreamResult>,
}

/// Outcome of one stream request: a response or an isolated error.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamResult {
    Ok { response: StreamResponse },
    Error { error: ErrorBody },
}

impl StreamResult {
    pub fn ok(response: StreamResponse) -> Self {
        StreamResult::Ok { response }
    }

    pub fn error(message: impl Into<String>) -> Self {
        StreamResult::Error { error: ErrorBody { message: message.into() } }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Successful response payload per request kind.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamResponse {
    Close,
    Execute {
        /// A statement result in the version-specific encoding
        /// (see [`super::stmt_result_to_json`]).
        result: serde_json::Value,
    },
    Batch {
        result: BatchResult,
    },
    Sequence,
    Describe {
        result: DescribeResponse,
    },
    StoreSql,
    CloseSql,
    GetAutocommit {
        is_autocommit: bool,
    },
}

/// Parallel arrays over batch steps: a result or null, and an error or null.
/// A skipped step is null in both.
#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub step_results: Vec<serde_json::Value>,
    pub step_errors: Vec<Option<ErrorBody>>,
}

#[derive(Debug, Serialize)]
pub struct DescribeResponse {
    pub params: Vec<DescribeParam>,
    pub cols: Vec<DescribeCol>,
    pub is_explain: bool,
    pub is_readonly: bool,
}

#[derive(Debug, Serialize)]
pub struct DescribeParam {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DescribeCol {
    pub name: String,
    pub decltype: Option<String>,
}
