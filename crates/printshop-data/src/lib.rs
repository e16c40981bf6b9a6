//! HTTP collaborators for the print shop configurator.
//!
//! Implements the catalog and pricing interfaces of `printshop-core` over
//! the print shop's JSON API.
//!
//! # Example
//!
//! ```rust,ignore
//! use printshop_core::prelude::*;
//! use printshop_data::{ApiClient, ApiConfig, HttpCatalogSource, HttpPricingSource};
//!
//! let client = Arc::new(ApiClient::new(ApiConfig::new("https://api.example.com/v1"))?);
//! let catalog = CatalogIndex::load(&HttpCatalogSource::new(client.clone()), &standard_sizes()).await?;
//! let resolver = config.resolver(Arc::new(HttpPricingSource::new(client)));
//! let configurator = Configurator::new(Arc::new(catalog), resolver);
//! ```

mod catalog;
mod client;
mod config;
mod dependency;
mod error;
mod pricing;

pub use catalog::HttpCatalogSource;
pub use client::ApiClient;
pub use config::ApiConfig;
pub use dependency::DependencyTag;
pub use error::FetchError;
pub use pricing::HttpPricingSource;
