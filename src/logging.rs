//! Log output setup.
//!
//! Two sinks, wired through one fern dispatch: an ANSI-colored console line
//! for interactive use and an uncolored line appended to the log file for
//! later inspection. Both carry the record target so protocol-layer messages
//! (`hranad_api::*`) are distinguishable from execution-layer ones
//! (`hranad_core::*`).

use colored::Colorize;
use log::{Level, LevelFilter};
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Color the level tag for the console sink.
fn level_tag(level: Level) -> colored::ColoredString {
    let tag = format!("{:<5}", level);
    match level {
        Level::Error => tag.red().bold(),
        Level::Warn => tag.yellow(),
        Level::Info => tag.green(),
        Level::Debug => tag.cyan(),
        Level::Trace => tag.purple().dimmed(),
    }
}

/// Wire up the configured sinks. Must run before anything logs.
pub fn init_logging(level: &str, file_path: &str, log_to_console: bool) -> anyhow::Result<()> {
    let level_filter = level_filter_from_str(level)?;

    if let Some(parent) = Path::new(file_path).parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(file_path)?;

    let dispatch = fern::Dispatch::new()
        .level(level_filter)
        // actix's accept loop and keep-alive churn drown out debug runs
        .level_for("actix_server", LevelFilter::Info)
        .level_for("actix_http", LevelFilter::Info);

    // File sink: `2026-08-02T14:03:55.012 WARN  hranad::lifecycle  message`
    let file_sink = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {}  {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(log_file);

    if log_to_console {
        let console_sink = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} {} {}  {}",
                    chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
                    level_tag(record.level()),
                    record.target().blue(),
                    message
                ))
            })
            .chain(std::io::stdout());
        dispatch.chain(console_sink).chain(file_sink).apply()?;
    } else {
        dispatch.chain(file_sink).apply()?;
    }

    Ok(())
}

/// Map a config string onto a level filter.
fn level_filter_from_str(level: &str) -> anyhow::Result<LevelFilter> {
    match level.to_ascii_lowercase().as_str() {
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(anyhow::anyhow!(
            "unrecognized logging.level '{}' (expected error, warn, info, debug, or trace)",
            other
        )),
    }
}
