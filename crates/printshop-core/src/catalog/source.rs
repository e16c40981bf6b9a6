//! Catalog collaborator interface.

use crate::catalog::{OptionLevel, ProductTypeRecord, SizeRecord, SubOptionRecord};
use crate::error::SourceError;
use crate::ids::{OptionId, ProductTypeId};
use async_trait::async_trait;
use std::collections::HashMap;

/// External catalog fetch collaborator.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All product types.
    async fn product_types(&self) -> Result<Vec<ProductTypeRecord>, SourceError>;

    /// Options for one level. Level-2 requests carry the chosen level-1
    /// option; a source without level dependencies returns its full
    /// level-2 set for every parent.
    async fn sub_options(
        &self,
        product_type: &ProductTypeId,
        level: OptionLevel,
        parent: Option<&OptionId>,
    ) -> Result<Vec<SubOptionRecord>, SourceError>;

    /// Per-product candidate sizes, or `None` to use the standard size table.
    async fn sizes(
        &self,
        _product_type: &ProductTypeId,
    ) -> Result<Option<Vec<SizeRecord>>, SourceError> {
        Ok(None)
    }
}

type OptionKey = (ProductTypeId, OptionLevel, Option<OptionId>);

/// In-memory catalog source (for development/testing).
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    product_types: Vec<ProductTypeRecord>,
    options: HashMap<OptionKey, Vec<SubOptionRecord>>,
    sizes: HashMap<ProductTypeId, Vec<SizeRecord>>,
    failure: Option<String>,
}

impl InMemoryCatalog {
    /// Create an empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog whose every fetch fails.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn with_product_type(mut self, record: ProductTypeRecord) -> Self {
        self.product_types.push(record);
        self
    }

    /// Register options for a level. Level-2 options registered without a
    /// parent are offered under every level-1 option.
    pub fn with_options(
        mut self,
        product_type: &str,
        level: OptionLevel,
        parent: Option<&str>,
        options: Vec<SubOptionRecord>,
    ) -> Self {
        let key = (
            ProductTypeId::new(product_type),
            level,
            parent.map(OptionId::new),
        );
        self.options.insert(key, options);
        self
    }

    pub fn with_sizes(mut self, product_type: &str, sizes: Vec<SizeRecord>) -> Self {
        self.sizes.insert(ProductTypeId::new(product_type), sizes);
        self
    }

    fn check_available(&self) -> Result<(), SourceError> {
        match &self.failure {
            Some(reason) => Err(SourceError::new(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn product_types(&self) -> Result<Vec<ProductTypeRecord>, SourceError> {
        self.check_available()?;
        Ok(self.product_types.clone())
    }

    async fn sub_options(
        &self,
        product_type: &ProductTypeId,
        level: OptionLevel,
        parent: Option<&OptionId>,
    ) -> Result<Vec<SubOptionRecord>, SourceError> {
        self.check_available()?;
        let scoped = (product_type.clone(), level, parent.cloned());
        let unscoped = (product_type.clone(), level, None);
        Ok(self
            .options
            .get(&scoped)
            .or_else(|| self.options.get(&unscoped))
            .cloned()
            .unwrap_or_default())
    }

    async fn sizes(
        &self,
        product_type: &ProductTypeId,
    ) -> Result<Option<Vec<SizeRecord>>, SourceError> {
        self.check_available()?;
        Ok(self.sizes.get(product_type).cloned())
    }
}
