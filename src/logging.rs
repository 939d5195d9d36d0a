//! Tracing setup.
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it only logs
//! when a log file is configured.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::AppError;

static INIT: OnceLock<()> = OnceLock::new();

/// Where log events go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
    Off,
}

impl LogSink {
    /// Sink for the interactive front-end.
    pub fn for_tui(log_file: Option<PathBuf>) -> Self {
        log_file.map(LogSink::File).unwrap_or(LogSink::Off)
    }
}

/// Install the global subscriber.
///
/// Safe to call multiple times; only the first call has effect.
pub fn init(filter: &str, sink: LogSink) -> Result<(), AppError> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(filter);

    match sink {
        LogSink::Off => {}
        LogSink::Stderr => {
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(io::stderr).with_target(false))
                .try_init();
        }
        LogSink::File(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| AppError::new(5, format!("Failed to open log file '{}': {e}", path.display())))?;
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .try_init();
        }
    }

    let _ = INIT.set(());
    Ok(())
}
