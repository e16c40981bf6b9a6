//! Pricing collaborator interface.

use crate::error::PricingFailure;
use crate::ids::{OptionId, ProductTypeId};
use crate::selection::Selection;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// `POST pricing` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
    pub product_type_id: ProductTypeId,
    pub width: f64,
    pub height: f64,
    /// Chosen sub-options, level 1 first.
    pub options: Vec<OptionId>,
    pub quantity: u32,
}

impl PriceRequest {
    /// Build the request for a complete selection.
    pub fn from_selection(selection: &Selection) -> Option<Self> {
        if !selection.is_complete() {
            return None;
        }
        let product_type = selection.product_type.as_ref()?;
        let size = selection.size?;
        let options = [&selection.level1, &selection.level2]
            .into_iter()
            .flatten()
            .map(|opt| opt.id.clone())
            .collect();

        Some(Self {
            product_type_id: product_type.id.clone(),
            width: size.width,
            height: size.height,
            options,
            quantity: selection.quantity,
        })
    }
}

/// Successful pricing payload, `{retailPrice, currency}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub retail_price: f64,
    pub currency: String,
}

/// External pricing collaborator.
#[async_trait]
pub trait PricingSource: Send + Sync {
    async fn quote(&self, request: &PriceRequest) -> Result<PriceResponse, PricingFailure>;
}
