//! Server-wide middleware configuration helpers.
//!
//! Keeps the Actix application setup focused by providing reusable
//! constructors for CORS, request logging, and path normalization.

use actix_cors::Cors;
use actix_web::middleware::{Logger, NormalizePath};

/// Build the CORS policy used by the server.
pub fn build_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

/// Build the request logger middleware.
pub fn request_logger() -> Logger {
    Logger::default()
}

/// Fold trailing-slash path variants onto their canonical routes.
pub fn trim_trailing_slash() -> NormalizePath {
    NormalizePath::trim()
}
