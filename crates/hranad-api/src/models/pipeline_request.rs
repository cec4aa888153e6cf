//! Pipeline request model (v2/v3)
//!
//! This module defines the structure of `POST /v2/pipeline` and
//! `POST /v3/pipeline` request bodies.
//!
//! # Example Request
//! ```json
//! {
//!   "baton": null,
//!   "requests": [
//!     {"type": "store_sql", "sql_id": 7, "sql": "SELECT ?"},
//!     {"type": "execute", "stmt": {"sql_id": 7, "args": [{"type": "integer", "value": "42"}]}},
//!     {"type": "close"}
//!   ]
//! }
//! ```

use serde::Deserialize;
use std::collections::HashMap;

/// Body of a pipeline request: an optional baton plus ordered stream requests.
#[derive(Debug, Deserialize)]
pub struct PipelineRequestBody {
    /// Baton from the previous pipeline on this stream; null/absent opens a
    /// new stream.
    #[serde(default)]
    pub baton: Option<String>,

    /// Requests evaluated in order against the one stream.
    pub requests: Vec<StreamRequest>,
}

/// One request inside a pipeline.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamRequest {
    Close,
    Execute {
        stmt: Stmt,
    },
    Batch {
        batch: Batch,
    },
    Sequence {
        #[serde(default)]
        sql: Option<String>,
        #[serde(default)]
        sql_id: Option<i32>,
    },
    Describe {
        #[serde(default)]
        sql: Option<String>,
        #[serde(default)]
        sql_id: Option<i32>,
    },
    StoreSql {
        sql_id: i32,
        sql: String,
    },
    CloseSql {
        sql_id: i32,
    },
    GetAutocommit,
}

/// One statement: SQL text (or a reference to stored SQL) plus arguments.
#[derive(Debug, Deserialize)]
pub struct Stmt {
    #[serde(default)]
    pub sql: Option<String>,

    /// Reference to SQL previously stored on the same stream.
    #[serde(default)]
    pub sql_id: Option<i32>,

    /// Positional arguments, in wire value encoding.
    #[serde(default)]
    pub args: Vec<serde_json::Value>,

    /// Named arguments; see [`NamedArgs`] for the accepted shapes.
    #[serde(default)]
    pub named_args: Option<NamedArgs>,
}

/// Named arguments arrive as a list of `{name, value}` pairs (v3) or as a
/// plain map (v2). Both resolve to the same name → value mapping.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NamedArgs {
    Pairs(Vec<NamedArg>),
    Map(HashMap<String, serde_json::Value>),
}

#[derive(Debug, Deserialize)]
pub struct NamedArg {
    pub name: String,
    pub value: serde_json::Value,
}

/// Ordered batch of steps with optional per-step conditions.
#[derive(Debug, Deserialize)]
pub struct Batch {
    pub steps: Vec<BatchStep>,
}

#[derive(Debug, Deserialize)]
pub struct BatchStep {
    #[serde(default)]
    pub condition: Option<BatchCond>,
    pub stmt: Stmt,
}

/// Condition tree guarding a batch step, evaluated against earlier steps.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchCond {
    /// True iff step `step` ran and succeeded.
    Ok { step: usize },
    /// True iff step `step` ran and failed.
    Error { step: usize },
    Not { cond: Box<BatchCond> },
}
