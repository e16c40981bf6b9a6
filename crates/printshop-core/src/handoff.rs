//! Checkout handoff record.

use crate::ids::{OptionId, ProductTypeId};
use crate::money::{Currency, Money};
use crate::selection::Selection;
use crate::ConfiguratorError;
use serde::{Deserialize, Serialize};

/// A completed, priced selection ready to become a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedSelection {
    pub product_type_id: ProductTypeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level1_id: Option<OptionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level2_id: Option<OptionId>,
    pub width: f64,
    pub height: f64,
    pub quantity: u32,
    pub unit_price: Money,
    pub total: Money,
    pub currency: Currency,
}

impl FinalizedSelection {
    pub(crate) fn new(selection: &Selection, unit_price: Money) -> Result<Self, ConfiguratorError> {
        let (Some(product_type), Some(size)) = (&selection.product_type, selection.size) else {
            return Err(ConfiguratorError::IncompleteSelection(
                selection.missing().join(", "),
            ));
        };
        let total = unit_price
            .checked_multiply(selection.quantity)
            .ok_or_else(|| ConfiguratorError::InvalidQuantity(selection.quantity.to_string()))?;

        Ok(Self {
            product_type_id: product_type.id.clone(),
            level1_id: selection.level1.as_ref().map(|o| o.id.clone()),
            level2_id: selection.level2.as_ref().map(|o| o.id.clone()),
            width: size.width,
            height: size.height,
            quantity: selection.quantity,
            unit_price,
            total,
            currency: unit_price.currency,
        })
    }
}
