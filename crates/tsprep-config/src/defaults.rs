//! Default values for every configuration section.

use crate::schema::*;
use std::path::PathBuf;

/// Host of the store sales API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.data.codeup.com";

/// Open Power Systems Data daily CSV for Germany.
pub const DEFAULT_OPS_URL: &str =
    "https://raw.githubusercontent.com/jenfly/opsd/master/opsd_germany_daily.csv";

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
            sources: SourcesConfig::default(),
            plot: PlotConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            use_cache: true,
            cache_data: true,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            ops_url: DEFAULT_OPS_URL.to_string(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            panel_height: 300,
            bins: 20,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormatSetting::Pretty,
            file: None,
        }
    }
}
