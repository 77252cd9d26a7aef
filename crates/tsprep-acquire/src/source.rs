//! HTTP transport behind the fetchers.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use tsprep_common::{Result, TsPrepError};
use tsprep_config::ApiConfig;

/// Something that can GET a URL and hand back its body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageSource: Send + Sync {
    /// GETs `url` and parses the body as JSON.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value>;

    /// GETs `url` and returns the body as text.
    async fn get_text(&self, url: &str) -> Result<String>;
}

/// [`PageSource`] over a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Creates a source. Without a timeout a hung request blocks forever.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TsPrepError::network_with_source("Failed to create HTTP client", e))?;
        Ok(Self { client })
    }

    /// Creates a source from the API section of the configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(config.timeout_secs.map(Duration::from_secs))
    }

    #[instrument(skip(self))]
    async fn get(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!(%status, "Received response");

        if !status.is_success() {
            return Err(TsPrepError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let body = self.get(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        self.get(url).await
    }
}
