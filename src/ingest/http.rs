// src/ingest/http.rs
//! Shared HTTP plumbing for the adapters: one client with a fixed timeout,
//! a user agent, and a courtesy pause between successive requests.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::HttpSettings;
use crate::error::SourceFetchError;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    delay: Duration,
}

impl HttpFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self, SourceFetchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            delay: settings.request_delay,
        })
    }

    /// GET a page body; non-2xx statuses are errors.
    pub async fn get_text(&self, url: &str) -> Result<String, SourceFetchError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    /// GET with query parameters and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceFetchError> {
        let v = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(v)
    }

    /// Sleep for the configured inter-request delay.
    pub async fn pace(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
