//! # hranad-api
//!
//! HTTP wire layer for hranad: route configuration, the v1 batch handler,
//! and the Hrana v2/v3 pipeline engine. Handlers translate between the JSON
//! wire shapes in [`models`] and the execution layer in hranad-core.

pub mod handlers;
pub mod models;
pub mod routes;

pub use routes::configure_routes;
