//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for tsprep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote JSON API configuration.
    pub api: ApiConfig,
    /// Local cache configuration.
    pub cache: CacheConfig,
    /// Static remote sources.
    pub sources: SourcesConfig,
    /// Histogram figure configuration.
    pub plot: PlotConfig,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

/// Remote JSON API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API host, without endpoint path.
    pub base_url: String,
    /// Per-request timeout in seconds. Unset means requests may block
    /// indefinitely.
    pub timeout_secs: Option<u64>,
}

/// Local cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding the cache files.
    pub dir: PathBuf,
    /// Read a dataset from its cache file when one exists.
    pub use_cache: bool,
    /// Write fetched datasets to their cache file.
    pub cache_data: bool,
}

/// Static remote sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// URL of the Open Power Systems Data daily CSV for Germany.
    pub ops_url: String,
}

/// Histogram figure configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Figure width in pixels.
    pub width: u32,
    /// Height of each per-column panel in pixels.
    pub panel_height: u32,
    /// Number of bins for numeric columns.
    pub bins: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Line layout.
    pub format: LogFormatSetting,
    /// Optional file to append logs to.
    pub file: Option<PathBuf>,
}

/// Line layout as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    /// Multi-line coloured output.
    Pretty,
    /// Single-line output.
    Compact,
}

impl LoggingSettings {
    /// Converts the settings into the subscriber configuration.
    pub fn to_logging_config(&self) -> tsprep_common::LoggingConfig {
        tsprep_common::LoggingConfig {
            level: self.level.clone(),
            format: match self.format {
                LogFormatSetting::Pretty => tsprep_common::LogFormat::Pretty,
                LogFormatSetting::Compact => tsprep_common::LogFormat::Compact,
            },
            file_path: self.file.clone(),
            ..tsprep_common::LoggingConfig::default()
        }
    }
}
