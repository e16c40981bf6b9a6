//! Print product configuration and pricing resolution.
//!
//! This crate holds the constraint-driven core behind the print ordering
//! wizard:
//!
//! - **Catalog**: product types, sub-options, candidate sizes (read-only, shared)
//! - **Envelope**: printable-size filtering with orientation normalization
//! - **Selection**: the invariant-preserving selection state machine
//! - **Pricing**: asynchronous quotes with stale-response discarding
//! - **Configurator**: the façade a UI drives
//!
//! # Example
//!
//! ```rust,ignore
//! use printshop_core::prelude::*;
//!
//! let catalog = Arc::new(CatalogIndex::load(&source, &config.sizes.standard).await?);
//! let resolver = PriceResolver::new(pricing, config.pricing.timeout());
//! let mut configurator = Configurator::new(catalog, resolver);
//!
//! configurator.select_product_type(&ProductTypeId::new("canvas075"))?;
//! if let Some(task) = configurator.select_size(16.0, 20.0)? {
//!     task.run().await;
//! }
//! let line = configurator.finalize()?;
//! println!("Total: {}", line.total.display());
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod configurator;
pub mod envelope;
pub mod handoff;
pub mod pricing;
pub mod selection;

pub use error::{ConfiguratorError, PricingFailure, SourceError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::ConfiguratorConfig;
    pub use crate::error::{ConfiguratorError, PricingFailure, SourceError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        CatalogIndex, CatalogSource, InMemoryCatalog, OptionKind, OptionLevel, OptionLevels,
        Orientation, ProductType, SizeOption, SubOption,
    };
    pub use crate::envelope::{filter_sizes, Envelope};

    // Selection
    pub use crate::selection::{parse_quantity, Selection, SelectionMachine, SelectionStage};

    // Pricing
    pub use crate::pricing::{
        PriceCache, PriceQuote, PriceRequest, PriceResolver, PriceResponse, PriceStatus,
        PricingSource, QuoteOutcome, QuoteTask,
    };

    // Façade
    pub use crate::configurator::Configurator;
    pub use crate::handoff::FinalizedSelection;
}
