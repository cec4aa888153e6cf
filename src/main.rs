//! hranad entrypoint: read config, bring up logging, hand off to the
//! lifecycle module for everything that actually serves traffic.

mod config;
mod lifecycle;
mod logging;
mod middleware;

use anyhow::Result;
use config::ServerConfig;
use hranad_commons::constants::Protocol;
use lifecycle::{bootstrap, run};
use log::info;

#[actix_web::main]
async fn main() -> Result<()> {
    // A missing or unreadable config.toml is not fatal; defaults cover it.
    let config = match ServerConfig::from_file("config.toml") {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("config.toml not loaded ({}); continuing with built-in defaults", e);
            ServerConfig::default()
        }
    };

    // Nothing may log before the sinks exist.
    logging::init_logging(
        &config.logging.level,
        &config.logging.file_path,
        config.logging.log_to_console,
    )?;

    info!("hranad v{} (protocol {})", env!("CARGO_PKG_VERSION"), Protocol::SERVER_VERSION);
    info!("Host: {}  Port: {}", config.server.host, config.server.port);

    let components = bootstrap(&config)?;
    run(&config, components).await
}
