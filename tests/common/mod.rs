//! Shared test server setup.
//!
//! Builds the real route configuration over a fresh in-memory SQLite
//! backend, so every test file exercises the same app the server binary
//! runs.

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::NormalizePath;
use actix_web::{test, web, App, Error};
use hranad_api::routes::configure_routes;
use hranad_core::{SqliteBackend, StatementExecutor, StreamRegistry};
use std::sync::Arc;
use std::time::Duration;

pub async fn spawn_service(
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    spawn_service_with_idle_timeout(Duration::from_secs(300)).await
}

pub async fn spawn_service_with_idle_timeout(
    idle_timeout: Duration,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let backend = SqliteBackend::open_in_memory().expect("open in-memory db");
    let executor = Arc::new(StatementExecutor::new(Arc::new(backend)));
    let registry = Arc::new(StreamRegistry::new(idle_timeout));

    test::init_service(
        App::new()
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(executor))
            .app_data(web::Data::new(registry))
            .configure(configure_routes),
    )
    .await
}

/// Assert the shape of a freshly minted baton: 32 random bytes, hex-encoded.
pub fn assert_baton_shape(baton: &serde_json::Value) {
    let baton = baton.as_str().expect("baton must be a string");
    assert_eq!(baton.len(), 64, "baton must be 64 hex chars, got {:?}", baton);
    assert!(baton.chars().all(|c| c.is_ascii_hexdigit()), "non-hex baton: {:?}", baton);
}
