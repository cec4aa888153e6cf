//! Protocol-wide constants for hranad.
//!
//! Centralizes the values both the wire layer and the stream registry agree
//! on, so that handlers, the registry, and the test suite never drift apart.

use std::time::Duration;

/// Wire-protocol constants.
pub struct Protocol;

impl Protocol {
    /// Version identifier reported by `GET /version`.
    ///
    /// Clients use this string for compatibility checks; it changes only when
    /// the wire behavior changes.
    pub const SERVER_VERSION: &'static str = "libsql-do-http-0.1.0";

    /// Number of random bytes in a baton before hex encoding.
    ///
    /// 32 bytes (256 bits) from a cryptographic RNG; the hex form seen on the
    /// wire is twice as long.
    pub const BATON_LEN: usize = 32;
}

/// Stream lifecycle defaults.
pub struct StreamDefaults;

impl StreamDefaults {
    /// How long a stream may sit idle between pipelines before it is dropped.
    pub const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

    /// Default interval for the background sweep of expired streams.
    pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);
}
