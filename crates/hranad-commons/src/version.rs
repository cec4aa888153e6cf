//! Protocol version selector.

use std::fmt;

/// The wire protocol a request arrived on.
///
/// The version is fixed by the route (`POST /` vs `/v2/pipeline` vs
/// `/v3/pipeline`) before any statement executes, and controls both the value
/// encoding and which result metadata fields appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// Simple batch protocol: raw JSON scalars, whole-batch error semantics.
    V1,
    /// Hrana over HTTP: tagged values, streams and batons.
    V2,
    /// Hrana 3: v2 plus per-statement metadata (row counters, timing).
    V3,
}

impl ProtocolVersion {
    /// Whether execute results carry `rows_read`/`rows_written`/
    /// `query_duration_ms` in the Hrana result encoding.
    #[inline]
    pub fn has_stmt_metadata(self) -> bool {
        matches!(self, ProtocolVersion::V3)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::V1 => write!(f, "v1"),
            ProtocolVersion::V2 => write!(f, "v2"),
            ProtocolVersion::V3 => write!(f, "v3"),
        }
    }
}
