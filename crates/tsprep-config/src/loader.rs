//! Configuration loading utilities

use crate::Config;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use tsprep_common::{Result as TsPrepResult, TsPrepError};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "TSPREP_CONFIG_PATH";

/// Files probed in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["tsprep.yaml", "tsprep.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for TsPrepError {
    fn from(err: ConfigError) -> Self {
        TsPrepError::config_with_source("Configuration loading failed", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration file");

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Load configuration from the environment and the usual file locations,
    /// falling back to defaults. The result is validated.
    pub fn load() -> TsPrepResult<Config> {
        let config = match Self::locate(env::var(CONFIG_PATH_VAR).ok()) {
            Some(path) => Self::load_config(path)?,
            None => {
                debug!("No configuration file found, using defaults");
                let mut config = Config::default();
                Self::apply_env_overrides(&mut config)?;
                config
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TsPrepResult<Config> {
        let config = Self::load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    fn locate(explicit: Option<String>) -> Option<PathBuf> {
        explicit.map(PathBuf::from).or_else(|| {
            DEFAULT_CONFIG_FILES
                .iter()
                .map(PathBuf::from)
                .find(|p| p.exists())
        })
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides(config, |var| env::var(var).ok())
    }

    /// Apply overrides read through `lookup`, keyed by environment variable name.
    pub fn apply_overrides(
        config: &mut Config,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup("TSPREP_API_URL") {
            config.api.base_url = url;
        }

        if let Some(timeout) = lookup("TSPREP_API_TIMEOUT") {
            config.api.timeout_secs =
                Some(timeout.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "TSPREP_API_TIMEOUT".to_string(),
                    source: Box::new(e),
                })?);
        }

        if let Some(dir) = lookup("TSPREP_CACHE_DIR") {
            config.cache.dir = PathBuf::from(dir);
        }

        if let Some(url) = lookup("TSPREP_OPS_URL") {
            config.sources.ops_url = url;
        }

        if let Some(level) = lookup("TSPREP_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}
