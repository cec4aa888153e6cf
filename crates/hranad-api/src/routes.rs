//! Route configuration
//!
//! Maps method+path to handlers for all three protocol versions:
//! - GET /health - liveness probe
//! - GET /version - wire-protocol version identifier
//! - GET /v2, GET /v3 - capability probes
//! - GET /v3-protobuf - probe for the unsupported protobuf encoding (404)
//! - POST /v2/pipeline, POST /v3/pipeline - Hrana pipelines
//! - POST /, POST /v1 - simple batch protocol
//!
//! Known paths hit with the wrong method answer 400; unknown paths 404.
//! Trailing-slash variants are folded by the server's NormalizePath
//! middleware before they reach this table. The whole set is mountable under
//! an arbitrary prefix by the embedding HTTP layer.

use crate::handlers;
use actix_web::web;

/// Configure all protocol routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/health")
            .route(web::get().to(handlers::health))
            .route(web::route().to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/version")
            .route(web::get().to(handlers::version))
            .route(web::route().to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/v2")
            .route(web::get().to(handlers::probe))
            .route(web::route().to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/v3")
            .route(web::get().to(handlers::probe))
            .route(web::route().to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/v3-protobuf")
            .route(web::get().to(handlers::protobuf_probe))
            .route(web::route().to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/v2/pipeline")
            .route(web::post().to(handlers::pipeline_v2))
            .route(web::route().to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/v3/pipeline")
            .route(web::post().to(handlers::pipeline_v3))
            .route(web::route().to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/")
            .route(web::post().to(handlers::batch_v1))
            .route(web::route().to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/v1")
            .route(web::post().to(handlers::batch_v1))
            .route(web::route().to(handlers::method_not_allowed)),
    )
    .default_service(web::route().to(handlers::not_found));
}
