//! Hrana stream state and the baton-keyed stream registry.
//!
//! A stream lives in the registry only between pipelines. `checkout` removes
//! it from the map, so exactly one in-flight pipeline can ever hold a given
//! stream; `checkin` re-inserts it under a freshly minted baton. Presenting a
//! baton therefore always consumes it, which is what makes batons single-use.

use dashmap::DashMap;
use hranad_commons::constants::Protocol;
use hranad_commons::{ProtocolError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-stream session state.
///
/// Owned by the registry while parked, moved out to the pipeline engine for
/// the duration of one request.
#[derive(Debug, Default)]
pub struct Stream {
    stored_sql: HashMap<i32, String>,
}

impl Stream {
    /// Cache a SQL text under a numeric id. Last write wins.
    pub fn store_sql(&mut self, sql_id: i32, sql: String) {
        self.stored_sql.insert(sql_id, sql);
    }

    /// Remove a cached SQL text. Idempotent.
    pub fn close_sql(&mut self, sql_id: i32) {
        self.stored_sql.remove(&sql_id);
    }

    /// Look up a cached SQL text.
    pub fn stored_sql(&self, sql_id: i32) -> Option<&str> {
        self.stored_sql.get(&sql_id).map(String::as_str)
    }
}

struct StreamEntry {
    stream: Stream,
    last_used: Instant,
}

/// Owns all parked streams, keyed by their current baton.
pub struct StreamRegistry {
    streams: DashMap<String, StreamEntry>,
    idle_timeout: Duration,
}

impl StreamRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self { streams: DashMap::new(), idle_timeout }
    }

    /// Take exclusive ownership of a stream for one pipeline.
    ///
    /// A null/absent baton mints a fresh stream. A presented baton is
    /// consumed: it is removed from the map whether or not the pipeline
    /// succeeds, and the caller gets a new one back at `checkin`. Expiry is
    /// checked lazily here in addition to the background sweep.
    pub fn checkout(&self, baton: Option<&str>) -> Result<Stream> {
        let baton = match baton {
            None => return Ok(Stream::default()),
            Some(baton) => baton,
        };
        let (_, entry) = self.streams.remove(baton).ok_or(ProtocolError::UnknownBaton)?;
        if entry.last_used.elapsed() > self.idle_timeout {
            return Err(ProtocolError::UnknownBaton);
        }
        Ok(entry.stream)
    }

    /// Park a stream again under a freshly minted baton and return it.
    pub fn checkin(&self, stream: Stream) -> String {
        let baton = mint_baton();
        self.streams.insert(baton.clone(), StreamEntry { stream, last_used: Instant::now() });
        baton
    }

    /// Drop every stream idle past the timeout. Returns how many were evicted.
    pub fn sweep(&self) -> usize {
        let before = self.streams.len();
        self.streams.retain(|_, entry| entry.last_used.elapsed() <= self.idle_timeout);
        before - self.streams.len()
    }

    /// Number of parked streams.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

/// 256 bits from the OS RNG, hex-encoded. Never derived from stream identity.
fn mint_baton() -> String {
    let mut bytes = [0u8; Protocol::BATON_LEN];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
