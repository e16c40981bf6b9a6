//! API connection settings.

use crate::dependency::DependencyTag;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where and how to reach the print shop API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://api.example.com/v1`.
    pub base_url: String,

    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_catalog_timeout_ms")]
    pub catalog_timeout_ms: u64,

    #[serde(default = "default_sizes_timeout_ms")]
    pub sizes_timeout_ms: u64,

    #[serde(default = "default_pricing_timeout_ms")]
    pub pricing_timeout_ms: u64,
}

fn default_catalog_timeout_ms() -> u64 {
    DependencyTag::Catalog.default_timeout().as_millis() as u64
}

fn default_sizes_timeout_ms() -> u64 {
    DependencyTag::Sizes.default_timeout().as_millis() as u64
}

fn default_pricing_timeout_ms() -> u64 {
    DependencyTag::Pricing.default_timeout().as_millis() as u64
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            catalog_timeout_ms: default_catalog_timeout_ms(),
            sizes_timeout_ms: default_sizes_timeout_ms(),
            pricing_timeout_ms: default_pricing_timeout_ms(),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Timeout for calls tagged `tag`.
    pub fn timeout_for(&self, tag: DependencyTag) -> Duration {
        let ms = match tag {
            DependencyTag::Catalog => self.catalog_timeout_ms,
            DependencyTag::Sizes => self.sizes_timeout_ms,
            DependencyTag::Pricing => self.pricing_timeout_ms,
        };
        Duration::from_millis(ms)
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
