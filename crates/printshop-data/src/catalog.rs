//! HTTP catalog source.

use async_trait::async_trait;
use printshop_core::catalog::{
    CatalogSource, OptionLevel, ProductTypeRecord, SizeRecord, SubOptionRecord,
};
use printshop_core::{OptionId, ProductTypeId, SourceError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::client::ApiClient;
use crate::dependency::DependencyTag;

/// List payload, either a bare array or `{"data": [...]}`.
///
/// Items are decoded one by one; a malformed item is skipped with a warning
/// instead of failing the whole listing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing {
    Items(Vec<Value>),
    Wrapped { data: Vec<Value> },
}

impl Listing {
    pub(crate) fn decode<T: DeserializeOwned>(self, what: &'static str) -> Vec<T> {
        let items = match self {
            Listing::Items(items) | Listing::Wrapped { data: items } => items,
        };
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(what, index, error = %e, "skipping malformed catalog record");
                    None
                }
            })
            .collect()
    }
}

/// Catalog collaborator backed by the print shop API.
///
/// - `GET product-types`
/// - `GET product-types/{id}/options?level=N[&parent=ID]`
/// - `GET product-types/{id}/sizes` (404 means "use the standard table")
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: Arc<ApiClient>,
}

impl HttpCatalogSource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn product_types(&self) -> Result<Vec<ProductTypeRecord>, SourceError> {
        let listing: Listing = self
            .client
            .get_json("product-types", &[], DependencyTag::Catalog)
            .await?;
        Ok(listing.decode("product type"))
    }

    async fn sub_options(
        &self,
        product_type: &ProductTypeId,
        level: OptionLevel,
        parent: Option<&OptionId>,
    ) -> Result<Vec<SubOptionRecord>, SourceError> {
        let path = format!("product-types/{}/options", product_type);
        let level = level.number().to_string();
        let mut query = vec![("level", level.as_str())];
        if let Some(parent) = parent {
            query.push(("parent", parent.as_str()));
        }

        let listing: Listing = self
            .client
            .get_json(&path, &query, DependencyTag::Catalog)
            .await?;
        Ok(listing.decode("option"))
    }

    async fn sizes(
        &self,
        product_type: &ProductTypeId,
    ) -> Result<Option<Vec<SizeRecord>>, SourceError> {
        let path = format!("product-types/{}/sizes", product_type);
        match self
            .client
            .get_json::<Listing>(&path, &[], DependencyTag::Sizes)
            .await
        {
            Ok(listing) => Ok(Some(listing.decode("size"))),
            Err(e) if e.is_not_found() => {
                tracing::debug!(product_type = %product_type, "no size list; using standard sizes");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
