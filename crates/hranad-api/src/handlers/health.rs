//! Health, version, and capability-probe handlers.

use actix_web::{HttpRequest, HttpResponse};
use hranad_commons::constants::Protocol;
use serde_json::json;

/// GET /health - liveness probe, plain-text body.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}

/// GET /version - wire-protocol version identifier.
pub async fn version() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "version": Protocol::SERVER_VERSION }))
}

/// GET /v2 and GET /v3 - protocol capability probes.
///
/// Clients issue these before switching to the newer protocol; any 2xx means
/// the version is spoken here.
pub async fn probe() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}

/// GET /v3-protobuf - probe for the protobuf encoding, which this server
/// does not speak. Answering 404 makes clients fall back to JSON.
pub async fn protobuf_probe() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "protobuf encoding is not supported" }))
}

/// Fallback for unknown paths.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": format!("Unknown endpoint: {} {}", req.method(), req.path())
    }))
}

/// Fallback for known paths hit with the wrong HTTP method.
pub async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "error": format!("Method {} is not supported on {}", req.method(), req.path())
    }))
}
