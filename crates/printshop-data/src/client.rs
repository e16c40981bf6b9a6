//! Print shop API client.

use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::dependency::DependencyTag;
use crate::error::FetchError;

const USER_AGENT_VALUE: &str = concat!("printshop-configurator/", env!("CARGO_PKG_VERSION"));

/// JSON client for the print shop API.
///
/// Every call is tagged with a [`DependencyTag`] that selects its timeout.
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| FetchError::Request(format!("invalid API key: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Request(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        tag: DependencyTag,
    ) -> Result<T, FetchError> {
        let url = self.config.url(path);
        let request = self
            .client
            .get(&url)
            .query(query)
            .timeout(self.config.timeout_for(tag));
        self.send(request, tag, &url).await
    }

    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        tag: DependencyTag,
    ) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.url(path);
        let request = self
            .client
            .post(&url)
            .json(body)
            .timeout(self.config.timeout_for(tag));
        self.send(request, tag, &url).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        tag: DependencyTag,
        url: &str,
    ) -> Result<T, FetchError> {
        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            tracing::warn!(%tag, url, error = %e, "request failed");
            FetchError::from(e)
        })?;

        let status = response.status();
        tracing::debug!(
            %tag,
            url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response received"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
