//! Configurator settings.

use crate::catalog::{standard_sizes, SizeOption};
use crate::pricing::{PriceCache, PriceResolver, PricingSource, DEFAULT_QUOTE_TIMEOUT};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Configurator configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfiguratorConfig {
    /// Pricing call behavior.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Size table used when the catalog has no per-product sizes.
    #[serde(default)]
    pub sizes: SizeConfig,
}

impl ConfiguratorConfig {
    /// Load config from a TOML or JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            Self::from_toml_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.pricing.timeout_ms == 0 {
            bail!("pricing.timeout_ms must be greater than zero");
        }
        if self.sizes.standard.is_empty() {
            bail!("sizes.standard must not be empty");
        }
        for size in &self.sizes.standard {
            SizeOption::new(size.width, size.height)
                .with_context(|| format!("invalid standard size {}", size))?;
        }
        Ok(())
    }

    /// Build a resolver over `source`, memoized when configured.
    pub fn resolver(&self, source: Arc<dyn PricingSource>) -> PriceResolver {
        let resolver = PriceResolver::new(source, self.pricing.timeout());
        if self.pricing.memoize {
            resolver.with_cache(PriceCache::new())
        } else {
            resolver
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingConfig {
    /// Timeout for a single pricing call.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Reuse resolved unit prices for identical items.
    #[serde(default = "default_true")]
    pub memoize: bool,
}

impl PricingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_QUOTE_TIMEOUT.as_millis() as u64
}

fn default_true() -> bool {
    true
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            memoize: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizeConfig {
    #[serde(default = "standard_sizes")]
    pub standard: Vec<SizeOption>,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            standard: standard_sizes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfiguratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, ConfiguratorConfig::default());
        assert_eq!(config.pricing.timeout(), DEFAULT_QUOTE_TIMEOUT);
        assert!(config.pricing.memoize);
        assert_eq!(config.sizes.standard.len(), standard_sizes().len());
    }

    #[test]
    fn test_parse_toml() {
        let config = ConfiguratorConfig::from_toml_str(
            r#"
            [pricing]
            timeout_ms = 2500
            memoize = false

            [[sizes.standard]]
            width = 8.0
            height = 10.0

            [[sizes.standard]]
            width = 16.0
            height = 20.0
            "#,
        )
        .unwrap();
        assert_eq!(config.pricing.timeout_ms, 2500);
        assert!(!config.pricing.memoize);
        assert_eq!(config.sizes.standard.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ConfiguratorConfig::default();
        config.pricing.timeout_ms = 0;
        assert!(config.validate().is_err());

        let config = ConfiguratorConfig::from_toml_str(
            r#"
            [[sizes.standard]]
            width = -8.0
            height = 10.0
            "#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("invalid standard size"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfiguratorConfig::load("/nonexistent/printshop.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
