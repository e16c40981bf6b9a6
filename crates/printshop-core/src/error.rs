//! Configurator error types.

use crate::catalog::OptionLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned synchronously by catalog, selection and façade operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfiguratorError {
    /// The catalog could not be fetched or parsed.
    #[error("Product catalog is unavailable: {0}")]
    CatalogUnavailable(String),

    /// A selection mutation was attempted before its preconditions were met.
    #[error("Cannot {action}: {reason}")]
    InvalidTransition {
        action: &'static str,
        reason: String,
    },

    /// Quantity was not a positive integer.
    #[error("Quantity must be a whole number of at least 1 (got {0})")]
    InvalidQuantity(String),

    /// A quote or hand-off was requested before the selection was complete.
    #[error("Selection is incomplete: missing {0}")]
    IncompleteSelection(String),

    /// Product type id not present in the catalog.
    #[error("Unknown product type: {0}")]
    UnknownProductType(String),

    /// Option id not offered at this level for the current selection.
    #[error("Unknown {level} option: {id}")]
    UnknownOption { level: OptionLevel, id: String },

    /// Size dimensions were not positive, finite inches.
    #[error("Invalid print size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
}

impl ConfiguratorError {
    /// Stable code for mapping errors to UI messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CatalogUnavailable(_) => "catalog_unavailable",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::InvalidQuantity(_) => "invalid_quantity",
            Self::IncompleteSelection(_) => "incomplete_selection",
            Self::UnknownProductType(_) => "unknown_product_type",
            Self::UnknownOption { .. } => "unknown_option",
            Self::InvalidSize { .. } => "invalid_size",
        }
    }

    /// Whether the UI can recover by re-prompting the user.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::CatalogUnavailable(_))
    }

    pub(crate) fn transition(action: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidTransition {
            action,
            reason: reason.into(),
        }
    }
}

/// Why a price quote failed.
///
/// Delivered through [`crate::pricing::PriceStatus::Failed`], never returned
/// as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum PricingFailure {
    /// Transport failure or timeout.
    #[error("Could not reach the pricing service: {0}")]
    NetworkError(String),

    /// The service has no price for this product/option/size combination.
    #[error("No price is available for this combination")]
    NoPriceForCombination,

    /// The service failed or returned a malformed payload.
    #[error("Pricing service error: {0}")]
    ServerError(String),
}

impl PricingFailure {
    /// Stable code for mapping failures to UI messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NetworkError(_) => "network_error",
            Self::NoPriceForCombination => "no_price_for_combination",
            Self::ServerError(_) => "server_error",
        }
    }
}

/// Failure reported by an external catalog collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SourceError(pub String);

impl SourceError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl From<SourceError> for ConfiguratorError {
    fn from(e: SourceError) -> Self {
        ConfiguratorError::CatalogUnavailable(e.0)
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError(format!("malformed catalog payload: {}", e))
    }
}
