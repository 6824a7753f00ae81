use crate::core::PageFetcher;
use crate::utils::error::{AdvisorError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Plain GET with the transport's default timeouts; no retry.
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("Making GET request to {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AdvisorError::FetchError {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        tracing::debug!("Plan of study response status: {}", status);
        if !status.is_success() {
            return Err(AdvisorError::FetchError {
                url: url.to_string(),
                message: format!("HTTP status {}", status),
            });
        }

        Ok(response.text().await?)
    }
}
