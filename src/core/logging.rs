//! Logging initialization.
//!
//! - Human-readable logs on stderr (stdout carries command output)
//! - Optional JSON logs in a daily rolling file
//! - `log` crate records forwarded to `tracing`
//! - miette handler for error reports at the binary boundary

use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Base name of the rolling log file.
pub const LOG_FILE_NAME: &str = "mtg-rules.log";

/// Build the filter: `RUST_LOG` wins, then the configured level.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the logging system.
///
/// Returns a `WorkerGuard` when file logging is enabled; it must be kept
/// alive so buffered lines are flushed on shutdown. Calling this twice is
/// harmless: the second call leaves the first subscriber in place.
pub fn init(config: &LoggingConfig, log_dir: &Path) -> Option<WorkerGuard> {
    let (file_layer, guard) = if config.file {
        if let Err(e) = fs::create_dir_all(log_dir) {
            eprintln!("Failed to create logs directory {}: {}", log_dir.display(), e);
        }
        let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .json()
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(stderr_layer)
        .with(file_layer);

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return guard;
    }

    // Redirect standard `log` macros to `tracing`
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    init_miette();

    if config.file {
        log::debug!(
            "Logging initialized. Writing to: {:?} (daily rolling)",
            log_dir.join(LOG_FILE_NAME)
        );
    }

    guard
}

fn init_miette() {
    let color = io::stderr().is_terminal();
    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .color(color)
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}
