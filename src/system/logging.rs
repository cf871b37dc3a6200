//! Logging system initialization
//!
//! This module sets up the tracing subscriber based on application
//! configuration: console output by default, append-to-file when
//! `LOG_FILE` is configured.

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Initialize the logging system.
///
/// **Note**: Call only once during startup, after the configuration has
/// been loaded.
///
/// # Returns
/// * `WorkerGuard` - Must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
///
/// # Panics
/// * If opening the log file fails
/// * If the global subscriber is already set
pub fn init_logging(config: &Config) -> tracing_appender::non_blocking::WorkerGuard {
    let to_file = config.log_file.is_some();

    let writer: Box<dyn std::io::Write + Send + Sync> = match &config.log_file {
        Some(log_file) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .expect("Failed to open log file");
            Box::new(file)
        }
        None => Box::new(std::io::stdout()),
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(writer);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        // 写文件时关闭 ANSI 颜色
        .with_ansi(!to_file)
        .init();

    guard
}
