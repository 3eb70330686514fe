pub mod canvas;
pub mod commands;
pub mod config;
pub mod error;
pub mod library;
pub mod models;
pub mod persistence;
pub mod presets;
pub mod properties;
pub mod state;
pub mod units;

use tracing_appender::non_blocking::WorkerGuard;

use config::LoggingConfig;
use error::AppError;

const LOG_FILE: &str = "invoice-designer.log";

/// Install the global tracing subscriber.
///
/// Logs go to a single (never-rotated) file in the configured directory,
/// by default the OS data dir:
///   Linux    ~/.local/share/invoice-designer/invoice-designer.log
///   macOS    ~/Library/Application Support/invoice-designer/invoice-designer.log
///   Windows  %LOCALAPPDATA%\invoice-designer\invoice-designer.log
///
/// `RUST_LOG` wins over the configured level. The returned guard flushes the
/// non-blocking writer on drop and must be held for the life of the process.
pub fn init_tracing(logging: &LoggingConfig) -> Result<WorkerGuard, AppError> {
    let log_dir = logging.directory();

    // tracing_appender::rolling::never panics if it cannot open the log file,
    // so the directory tree is created first.
    std::fs::create_dir_all(&log_dir).map_err(|e| {
        AppError::Io(format!("cannot create log directory {}: {e}", log_dir.display()))
    })?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(logging.level())),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .try_init()
        .map_err(|e| AppError::Config(format!("cannot install tracing subscriber: {e}")))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "invoice designer starting");
    Ok(guard)
}
