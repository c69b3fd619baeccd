//! File-based logging
//!
//! Writes logs under the configured directory, separated by log type:
//! - <dir>/main   - all logs, JSON lines
//! - <dir>/error  - WARN and ERROR only
//! - <dir>/fetch  - ticker endpoint requests
//! plus a console layer. RUST_LOG overrides the configured level.

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

/// Log subdirectories created under the log root
pub const LOG_TYPES: [&str; 3] = ["main", "error", "fetch"];

/// Initialize file and console logging
///
/// Returns the WorkerGuards, which must be kept alive for the duration of
/// the program or buffered lines are lost.
/// # Errors
/// Returns error if the log directories cannot be created.
pub fn init_logging(log_dir: &Path, default_level: &str) -> io::Result<Vec<WorkerGuard>> {
    create_log_dirs(log_dir)?;

    let mut guards = Vec::new();

    // Main log - all logs
    let (main_appender, main_guard) = create_appender(&log_dir.join("main"), "main");
    guards.push(main_guard);

    // Error log - ERROR and WARN only
    let (error_appender, error_guard) = create_appender(&log_dir.join("error"), "error");
    guards.push(error_guard);

    // Fetch log - endpoint requests
    let (fetch_appender, fetch_guard) = create_appender(&log_dir.join("fetch"), "fetch");
    guards.push(fetch_guard);

    let main_layer = tracing_subscriber::fmt::layer()
        .with_writer(main_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .json();

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    let fetch_layer = tracing_subscriber::fmt::layer()
        .with_writer(fetch_appender)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
            metadata.target().contains("fetch") || metadata.target().contains("rest")
        }));

    // Console layer for development
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(main_layer)
        .with(error_layer)
        .with(fetch_layer)
        .with(console_layer)
        .init();

    tracing::info!("Logging system initialized. Log files in {}", log_dir.display());

    Ok(guards)
}

/// RUST_LOG if set and valid, else `default_level`, else "info"
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn create_log_dirs(log_dir: &Path) -> io::Result<()> {
    for log_type in &LOG_TYPES {
        fs::create_dir_all(log_dir.join(log_type))?;
    }
    Ok(())
}

/// Create a daily rolling file appender
fn create_appender(dir: &Path, name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, name);

    tracing_appender::non_blocking(appender)
}

/// Log macro helpers for specific log types
#[macro_export]
macro_rules! log_fetch {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "fetch", $level, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_render {
    ($level:expr, $($arg:tt)+) => {
        tracing::event!(target: "render", $level, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_creation() {
        let test_dir = std::env::temp_dir().join(format!("uz-ticker-logs-{}", std::process::id()));
        fs::remove_dir_all(&test_dir).ok();

        create_log_dirs(&test_dir).unwrap();
        for log_type in &LOG_TYPES {
            assert!(test_dir.join(log_type).exists());
        }

        fs::remove_dir_all(&test_dir).ok();
    }

    #[test]
    fn test_env_filter_falls_back_on_bad_directive() {
        // Never panics, whatever RUST_LOG holds
        let _ = env_filter("uz_ticker=debug");
        let _ = env_filter("[[[not a filter");
    }
}
