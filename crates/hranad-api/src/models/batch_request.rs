//! V1 batch request model
//!
//! # Example Request
//! ```json
//! {
//!   "statements": [
//!     "CREATE TABLE t(id INTEGER PRIMARY KEY, v TEXT)",
//!     {"q": "INSERT INTO t(v) VALUES(?)", "params": ["hi"]},
//!     {"q": "SELECT * FROM t WHERE v = :v", "params": {":v": "hi"}}
//!   ]
//! }
//! ```

use serde::Deserialize;
use std::collections::HashMap;

/// Body of a `POST /` or `POST /v1` request.
#[derive(Debug, Deserialize)]
pub struct BatchRequestBody {
    pub statements: Vec<V1Statement>,
}

/// A bare SQL string, or SQL with parameters.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum V1Statement {
    Sql(String),
    Parameterized {
        q: String,
        #[serde(default)]
        params: Option<V1Params>,
    },
}

/// Positional array or named map, raw wire values either way.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum V1Params {
    Positional(Vec<serde_json::Value>),
    Named(HashMap<String, serde_json::Value>),
}
