//! Structured logging infrastructure for tsprep

use crate::{Result, TsPrepError};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Output layout of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, coloured output for terminals
    #[default]
    Pretty,
    /// Single-line output
    Compact,
}

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "tsprep_acquire=debug")
    pub level: String,
    /// Line layout
    pub format: LogFormat,
    /// Optional file to append log output to instead of stderr
    pub file_path: Option<PathBuf>,
    /// Whether to include span open/close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. When a file is
/// configured the returned guard must be held until shutdown so buffered
/// lines are flushed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| TsPrepError::config_with_source("Invalid log level filter", e))?;

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let (writer, guard) = match &config.file_path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            (fmt::writer::BoxMakeWriter::new(writer), Some(guard))
        }
        None => (fmt::writer::BoxMakeWriter::new(std::io::stderr), None),
    };
    let ansi = config.file_path.is_none();

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_span_events(span_events)
                    .with_target(config.include_targets)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_span_events(span_events)
                    .with_target(config.include_targets)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init(),
    };
    installed.map_err(|e| TsPrepError::config_with_source("Logging already initialised", e))?;

    Ok(guard)
}

/// Initialize logging with default configuration
pub fn init_default_logging() -> Result<Option<WorkerGuard>> {
    init_logging(&LoggingConfig::default())
}
