//! Shared, read-only catalog index.

use crate::catalog::{
    CatalogSource, OptionLevel, OptionLevels, ProductType, SizeOption, SubOption,
};
use crate::envelope::filter_sizes;
use crate::ids::{OptionId, ProductTypeId};
use crate::ConfiguratorError;
use std::collections::HashMap;

/// Product types, their options and candidate sizes.
///
/// Loaded once per process and shared (behind an `Arc`) by every
/// configurator; there are no mutation operations after `load`.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    product_types: Vec<ProductType>,
    level1: HashMap<ProductTypeId, Vec<SubOption>>,
    level2: HashMap<(ProductTypeId, OptionId), Vec<SubOption>>,
    sizes: HashMap<ProductTypeId, Vec<SizeOption>>,
}

impl CatalogIndex {
    /// Fetch and validate the whole catalog.
    ///
    /// Malformed records are skipped with a warning. Any collaborator
    /// failure, or a catalog with no usable product types, is
    /// `CatalogUnavailable`.
    pub async fn load(
        source: &dyn CatalogSource,
        standard_sizes: &[SizeOption],
    ) -> Result<Self, ConfiguratorError> {
        let mut index = CatalogIndex::default();

        for record in source.product_types().await? {
            let product_type = match ProductType::try_from(record) {
                Ok(pt) => pt,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed product type");
                    continue;
                }
            };
            if index.product_type(&product_type.id).is_some() {
                tracing::warn!(product_type = %product_type.id, "skipping duplicate product type");
                continue;
            }
            index.load_product_type(source, &product_type, standard_sizes).await?;
            index.product_types.push(product_type);
        }

        if index.product_types.is_empty() {
            return Err(ConfiguratorError::CatalogUnavailable(
                "catalog contains no usable product types".to_string(),
            ));
        }

        tracing::info!(
            product_types = index.product_types.len(),
            level1_groups = index.level1.len(),
            level2_groups = index.level2.len(),
            "catalog loaded"
        );
        Ok(index)
    }

    async fn load_product_type(
        &mut self,
        source: &dyn CatalogSource,
        product_type: &ProductType,
        standard_sizes: &[SizeOption],
    ) -> Result<(), ConfiguratorError> {
        let id = &product_type.id;

        if product_type.option_levels >= OptionLevels::One {
            let level1 = fetch_options(source, id, OptionLevel::One, None).await?;
            if product_type.option_levels == OptionLevels::Two {
                for parent in &level1 {
                    let level2 =
                        fetch_options(source, id, OptionLevel::Two, Some(&parent.id)).await?;
                    self.level2.insert((id.clone(), parent.id.clone()), level2);
                }
            }
            self.level1.insert(id.clone(), level1);
        }

        let sizes = match source.sizes(id).await? {
            Some(records) => records
                .into_iter()
                .filter_map(|r| match SizeOption::try_from(r) {
                    Ok(size) => Some(size),
                    Err(e) => {
                        tracing::warn!(product_type = %id, error = %e, "skipping malformed size");
                        None
                    }
                })
                .collect(),
            None => standard_sizes.to_vec(),
        };
        self.sizes.insert(id.clone(), sizes);
        Ok(())
    }

    pub fn product_types(&self) -> &[ProductType] {
        &self.product_types
    }

    pub fn product_type(&self, id: &ProductTypeId) -> Option<&ProductType> {
        self.product_types.iter().find(|pt| &pt.id == id)
    }

    /// Options at `level`. Level 2 requires the chosen level-1 option;
    /// without it, or when the product has no options there, the slice is
    /// empty.
    pub fn sub_options(
        &self,
        product_type: &ProductTypeId,
        level: OptionLevel,
        parent: Option<&OptionId>,
    ) -> &[SubOption] {
        let options = match (level, parent) {
            (OptionLevel::One, _) => self.level1.get(product_type),
            (OptionLevel::Two, Some(parent)) => {
                self.level2.get(&(product_type.clone(), parent.clone()))
            }
            (OptionLevel::Two, None) => None,
        };
        options.map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn sub_option(
        &self,
        product_type: &ProductTypeId,
        level: OptionLevel,
        parent: Option<&OptionId>,
        id: &OptionId,
    ) -> Option<&SubOption> {
        self.sub_options(product_type, level, parent)
            .iter()
            .find(|opt| &opt.id == id)
    }

    /// Unfiltered candidate sizes for a product type.
    pub fn candidate_sizes(&self, product_type: &ProductTypeId) -> &[SizeOption] {
        self.sizes
            .get(product_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Candidate sizes narrowed by the product type's envelope.
    pub fn sizes_for(&self, product_type: &ProductType) -> Vec<SizeOption> {
        filter_sizes(self.candidate_sizes(&product_type.id), &product_type.envelope)
    }
}

async fn fetch_options(
    source: &dyn CatalogSource,
    product_type: &ProductTypeId,
    level: OptionLevel,
    parent: Option<&OptionId>,
) -> Result<Vec<SubOption>, ConfiguratorError> {
    let records = source.sub_options(product_type, level, parent).await?;
    let mut options: Vec<SubOption> = Vec::with_capacity(records.len());
    for record in records {
        match record.into_option(product_type, level, parent) {
            Ok(opt) if options.iter().any(|o| o.id == opt.id) => {
                tracing::warn!(product_type = %product_type, option = %opt.id, "skipping duplicate option");
            }
            Ok(opt) => options.push(opt),
            Err(e) => {
                tracing::warn!(product_type = %product_type, %level, error = %e, "skipping malformed option");
            }
        }
    }
    Ok(options)
}
