//! # hranad-commons
//!
//! Shared types, constants, and the wire value codec for hranad.
//!
//! This crate provides the foundational pieces used across all hranad crates
//! (hranad-core, hranad-api, the server binary): the tagged [`Value`] model
//! with its per-version JSON encoders, the shared [`ProtocolError`] type, and
//! protocol-level constants. It sits at the bottom of the dependency graph to
//! prevent circular dependency issues.
//!
//! ## Example Usage
//!
//! ```rust
//! use hranad_commons::value::{decode_any, Value};
//!
//! let wire = serde_json::json!({"type": "integer", "value": "42"});
//! assert_eq!(decode_any(&wire), Ok(Value::Integer(42)));
//! ```

pub mod constants;
pub mod errors;
pub mod value;
pub mod version;

// Re-export commonly used types at crate root
pub use errors::{ProtocolError, Result};
pub use value::Value;
pub use version::ProtocolVersion;
