//! Selection state machine.

use crate::catalog::{OptionLevel, OptionLevels, ProductType, SizeOption, SubOption};
use crate::selection::{validate_quantity, Selection, SelectionStage};
use crate::ConfiguratorError;

/// Authoritative holder of a [`Selection`].
///
/// Every upstream change clears the fields downstream of it
/// (product type → level 1 → level 2 → size). Failed mutations leave the
/// selection untouched. A confirmed quantity survives everything except a
/// product type change.
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    selection: Selection,
    quantity_confirmed: bool,
}

impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn stage(&self) -> SelectionStage {
        match self.selection.stage() {
            SelectionStage::SizeChosen if self.quantity_confirmed => SelectionStage::Quantified,
            stage => stage,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.selection.is_complete()
    }

    /// Choose a product type. Clears everything downstream and resets the
    /// quantity to 1.
    pub fn set_product_type(&mut self, product_type: ProductType) {
        self.selection = Selection {
            product_type: Some(product_type),
            ..Selection::default()
        };
        self.quantity_confirmed = false;
    }

    /// Choose the level-1 option. Clears level 2 and size.
    pub fn set_level1(&mut self, option: SubOption) -> Result<(), ConfiguratorError> {
        const ACTION: &str = "select level 1 option";

        let product_type = self
            .selection
            .product_type
            .as_ref()
            .ok_or_else(|| ConfiguratorError::transition(ACTION, "no product type selected"))?;
        if product_type.option_levels == OptionLevels::None {
            return Err(ConfiguratorError::transition(
                ACTION,
                format!("{} has no options", product_type.name),
            ));
        }
        check_option(&option, product_type, OptionLevel::One, ACTION)?;

        self.selection.level1 = Some(option);
        self.selection.level2 = None;
        self.selection.size = None;
        Ok(())
    }

    /// Choose the level-2 option. Clears size.
    pub fn set_level2(&mut self, option: SubOption) -> Result<(), ConfiguratorError> {
        const ACTION: &str = "select level 2 option";

        let product_type = self
            .selection
            .product_type
            .as_ref()
            .ok_or_else(|| ConfiguratorError::transition(ACTION, "no product type selected"))?;
        if product_type.option_levels != OptionLevels::Two {
            return Err(ConfiguratorError::transition(
                ACTION,
                format!("{} has no second option level", product_type.name),
            ));
        }
        let level1 = self
            .selection
            .level1
            .as_ref()
            .ok_or_else(|| ConfiguratorError::transition(ACTION, "no level 1 option selected"))?;
        check_option(&option, product_type, OptionLevel::Two, ACTION)?;
        if !option.is_offered_under(&level1.id) {
            return Err(ConfiguratorError::transition(
                ACTION,
                format!("{} is not offered with {}", option.name, level1.name),
            ));
        }

        self.selection.level2 = Some(option);
        self.selection.size = None;
        Ok(())
    }

    /// Choose a size. The size is stored in the envelope's orientation.
    pub fn set_size(&mut self, size: SizeOption) -> Result<SizeOption, ConfiguratorError> {
        const ACTION: &str = "select size";

        let product_type = self
            .selection
            .product_type
            .as_ref()
            .ok_or_else(|| ConfiguratorError::transition(ACTION, "no product type selected"))?;
        if !self.selection.levels_complete() {
            return Err(ConfiguratorError::transition(
                ACTION,
                format!("missing {}", self.selection.missing().join(", ")),
            ));
        }
        let envelope = &product_type.envelope;
        if !envelope.admits(&size) {
            return Err(ConfiguratorError::transition(
                ACTION,
                format!("{} is outside the printable range of {}", size, product_type.name),
            ));
        }

        let normalized = envelope.normalize(&size);
        self.selection.size = Some(normalized);
        Ok(normalized)
    }

    /// Set the quantity. Does not clear any other field.
    pub fn set_quantity(&mut self, quantity: i64) -> Result<u32, ConfiguratorError> {
        let quantity = validate_quantity(quantity)?;
        self.selection.quantity = quantity;
        self.quantity_confirmed = true;
        Ok(quantity)
    }

    /// Back to an empty selection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn check_option(
    option: &SubOption,
    product_type: &ProductType,
    level: OptionLevel,
    action: &'static str,
) -> Result<(), ConfiguratorError> {
    if option.level != level {
        return Err(ConfiguratorError::transition(
            action,
            format!("{} is a {} option", option.name, option.level),
        ));
    }
    if option.product_type_id != product_type.id {
        return Err(ConfiguratorError::transition(
            action,
            format!("{} does not belong to {}", option.name, product_type.name),
        ));
    }
    Ok(())
}
