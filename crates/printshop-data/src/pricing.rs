//! HTTP pricing source.

use async_trait::async_trait;
use printshop_core::pricing::{PriceRequest, PriceResponse, PricingSource};
use printshop_core::PricingFailure;
use serde::Deserialize;
use std::sync::Arc;

use crate::client::ApiClient;
use crate::dependency::DependencyTag;

/// `POST pricing` reply: a price, or `{"error": "..."}` when the
/// combination has none.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PricingReply {
    Price(PriceResponse),
    Rejected { error: String },
}

impl PricingReply {
    pub(crate) fn into_result(self) -> Result<PriceResponse, PricingFailure> {
        match self {
            PricingReply::Price(price) => Ok(price),
            PricingReply::Rejected { error } => {
                tracing::debug!(reason = %error, "pricing rejected combination");
                Err(PricingFailure::NoPriceForCombination)
            }
        }
    }
}

/// Pricing collaborator backed by the print shop API.
#[derive(Debug, Clone)]
pub struct HttpPricingSource {
    client: Arc<ApiClient>,
}

impl HttpPricingSource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PricingSource for HttpPricingSource {
    async fn quote(&self, request: &PriceRequest) -> Result<PriceResponse, PricingFailure> {
        self.client
            .post_json::<_, PricingReply>("pricing", request, DependencyTag::Pricing)
            .await
            .map_err(|e| e.into_pricing_failure())?
            .into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<PriceResponse, PricingFailure> {
        serde_json::from_str::<PricingReply>(body)
            .map_err(|e| crate::FetchError::from(e).into_pricing_failure())
            .and_then(PricingReply::into_result)
    }

    #[test]
    fn test_price_reply() {
        let price = parse(r#"{"retailPrice": 79.99, "currency": "USD"}"#).unwrap();
        assert_eq!(price.retail_price, 79.99);
        assert_eq!(price.currency, "USD");
    }

    #[test]
    fn test_error_reply_means_no_price() {
        assert_eq!(
            parse(r#"{"error": "size not offered"}"#),
            Err(PricingFailure::NoPriceForCombination)
        );
    }

    #[test]
    fn test_garbage_reply_is_server_error() {
        let failure = parse(r#"{"price": "cheap"}"#).unwrap_err();
        assert_eq!(failure.kind(), "server_error");
    }
}
