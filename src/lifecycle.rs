//! Server lifecycle management helpers.
//!
//! This module encapsulates the heavy lifting kept out of `main.rs`:
//! building the backend and registry, wiring the HTTP server, and
//! coordinating graceful shutdown.

use crate::config::ServerConfig;
use crate::middleware;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use hranad_api::routes;
use hranad_core::{SqliteBackend, StatementExecutor, StreamRegistry};
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Aggregated application components shared across the HTTP server and the
/// background sweeper.
pub struct ApplicationComponents {
    pub executor: Arc<StatementExecutor>,
    pub registry: Arc<StreamRegistry>,
}

/// Initialize the SQLite backend, statement executor, and stream registry.
pub fn bootstrap(config: &ServerConfig) -> Result<ApplicationComponents> {
    let backend = if config.database.in_memory {
        info!("SQLite backend: private in-memory database");
        SqliteBackend::open_in_memory()?
    } else {
        let db_path = Path::new(&config.database.path);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let backend =
            SqliteBackend::open(db_path, Duration::from_millis(config.database.busy_timeout_ms))?;
        info!("SQLite backend ready at {}", db_path.display());
        backend
    };

    let executor = Arc::new(StatementExecutor::new(Arc::new(backend)));
    let registry =
        Arc::new(StreamRegistry::new(Duration::from_secs(config.streams.idle_timeout_seconds)));
    info!(
        "Stream registry initialized (idle timeout {}s, sweep every {}s)",
        config.streams.idle_timeout_seconds, config.streams.sweep_interval_seconds
    );

    Ok(ApplicationComponents { executor, registry })
}

/// Start the HTTP server and manage graceful shutdown.
pub async fn run(config: &ServerConfig, components: ApplicationComponents) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP server on {}", bind_addr);
    info!("Endpoints: POST /, POST /v1, POST /v2/pipeline, POST /v3/pipeline, GET /health, GET /version");

    // Expired streams are also dropped lazily on checkout; the sweep keeps
    // abandoned ones from accumulating between lookups.
    let sweeper_registry = components.registry.clone();
    let sweep_interval = Duration::from_secs(config.streams.sweep_interval_seconds.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            let evicted = sweeper_registry.sweep();
            if evicted > 0 {
                debug!("Evicted {} idle stream(s)", evicted);
            }
        }
    });

    let executor = components.executor.clone();
    let registry = components.registry.clone();
    let max_body_bytes = config.limits.max_body_bytes;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::request_logger())
            .wrap(middleware::build_cors())
            .wrap(middleware::trim_trailing_slash())
            .app_data(web::PayloadConfig::new(max_body_bytes))
            .app_data(web::Data::new(executor.clone()))
            .app_data(web::Data::new(registry.clone()))
            .configure(routes::configure_routes)
    })
    .bind(&bind_addr)?
    .workers(if config.server.workers == 0 { num_cpus::get() } else { config.server.workers })
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            if let Err(e) = result {
                log::error!("Server task failed: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
            server_handle.stop(true).await;
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
