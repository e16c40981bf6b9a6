//! Price quotes.
//!
//! A quote is resolved asynchronously through a [`PricingSource`]. The
//! resolver tags every request with a revision; a response whose revision
//! is no longer current is dropped instead of overwriting a newer quote.

mod cache;
mod resolver;
mod source;

pub use cache::{PriceCache, PriceKey};
pub use resolver::{PriceResolver, QuoteOutcome, QuoteTask, DEFAULT_QUOTE_TIMEOUT};
pub use source::{PriceRequest, PriceResponse, PricingSource};

use crate::error::PricingFailure;
use crate::money::Money;
use crate::selection::Selection;
use serde::{Deserialize, Serialize};

/// State of a price quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PriceStatus {
    /// No quote requested for the current selection.
    #[default]
    Idle,
    /// Request outstanding.
    Pending,
    /// Unit price received.
    Resolved { unit_price: Money },
    /// The request failed; retrying is up to the caller.
    Failed { failure: PricingFailure },
}

/// A quote and the selection it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PriceQuote {
    pub status: PriceStatus,
    pub selection: Option<Selection>,
}

impl PriceQuote {
    pub fn idle() -> Self {
        Self::default()
    }

    pub(crate) fn pending(selection: Selection) -> Self {
        Self {
            status: PriceStatus::Pending,
            selection: Some(selection),
        }
    }

    pub(crate) fn resolved(selection: Selection, unit_price: Money) -> Self {
        Self {
            status: PriceStatus::Resolved { unit_price },
            selection: Some(selection),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == PriceStatus::Idle
    }

    pub fn is_pending(&self) -> bool {
        self.status == PriceStatus::Pending
    }

    pub fn unit_price(&self) -> Option<Money> {
        match &self.status {
            PriceStatus::Resolved { unit_price } => Some(*unit_price),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&PricingFailure> {
        match &self.status {
            PriceStatus::Failed { failure } => Some(failure),
            _ => None,
        }
    }

    /// Unit price × quantity of the tagged selection, computed on read.
    pub fn total(&self) -> Option<Money> {
        let quantity = self.selection.as_ref()?.quantity;
        self.unit_price()?.checked_multiply(quantity)
    }

    /// Whether this quote was computed for `selection`.
    pub fn is_for(&self, selection: &Selection) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| s.same_priced_item(selection) && s.quantity == selection.quantity)
    }
}
