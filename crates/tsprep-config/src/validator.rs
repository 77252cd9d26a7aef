//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use tsprep_common::{Result, TsPrepError};
use url::Url;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration.
    pub fn validate(config: &Config) -> Result<()> {
        config.validate()
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        check_url("api.base_url", &self.api.base_url)?;
        check_url("sources.ops_url", &self.sources.ops_url)?;

        if self.api.timeout_secs == Some(0) {
            return Err(TsPrepError::config("api.timeout_secs must be greater than 0"));
        }
        if self.plot.bins == 0 {
            return Err(TsPrepError::config("plot.bins must be greater than 0"));
        }
        if self.plot.width == 0 || self.plot.panel_height == 0 {
            return Err(TsPrepError::config(
                "plot.width and plot.panel_height must be greater than 0",
            ));
        }

        Ok(())
    }
}

fn check_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| TsPrepError::config_with_source(format!("{field} is not a valid URL"), e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TsPrepError::config(format!(
            "{field} must use http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sources.ops_url = "ftp://example.test/opsd.csv".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.plot.bins = 0;
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = Config::default();
        config.api.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }
}
