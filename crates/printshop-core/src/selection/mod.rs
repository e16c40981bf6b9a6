//! Selection state.
//!
//! [`Selection`] is the plain configuration snapshot; [`SelectionMachine`]
//! is the only thing allowed to mutate it.

mod machine;

pub use machine::SelectionMachine;

use crate::catalog::{ProductType, SizeOption, SubOption};
use crate::ConfiguratorError;
use serde::{Deserialize, Serialize};

/// Steps of the configuration wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SelectionStage {
    Empty,
    TypeChosen,
    Level1Chosen,
    Level2Chosen,
    SizeChosen,
    /// Size chosen and quantity confirmed; ready for hand-off.
    Quantified,
}

impl SelectionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStage::Empty => "empty",
            SelectionStage::TypeChosen => "type_chosen",
            SelectionStage::Level1Chosen => "level1_chosen",
            SelectionStage::Level2Chosen => "level2_chosen",
            SelectionStage::SizeChosen => "size_chosen",
            SelectionStage::Quantified => "quantified",
        }
    }

    /// Zero-based step number, for progress indicators.
    pub fn step(&self) -> u8 {
        *self as u8
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SelectionStage::Empty => "Choose a product",
            SelectionStage::TypeChosen => "Product chosen",
            SelectionStage::Level1Chosen => "First option chosen",
            SelectionStage::Level2Chosen => "Second option chosen",
            SelectionStage::SizeChosen => "Size chosen",
            SelectionStage::Quantified => "Ready to order",
        }
    }
}

/// The in-progress configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub product_type: Option<ProductType>,
    pub level1: Option<SubOption>,
    pub level2: Option<SubOption>,
    pub size: Option<SizeOption>,
    pub quantity: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            product_type: None,
            level1: None,
            level2: None,
            size: None,
            quantity: 1,
        }
    }
}

impl Selection {
    /// Sub-option steps required by the chosen product type.
    pub fn required_levels(&self) -> u8 {
        self.product_type
            .as_ref()
            .map_or(0, |pt| pt.option_levels.count())
    }

    /// Whether every required sub-option is set.
    pub fn levels_complete(&self) -> bool {
        if self.product_type.is_none() {
            return false;
        }
        match self.required_levels() {
            0 => true,
            1 => self.level1.is_some(),
            _ => self.level1.is_some() && self.level2.is_some(),
        }
    }

    /// Product type, all required levels and size are set.
    pub fn is_complete(&self) -> bool {
        self.levels_complete() && self.size.is_some()
    }

    /// Names of the unset required fields.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.product_type.is_none() {
            missing.push("product type");
        }
        let required = self.required_levels();
        if required >= 1 && self.level1.is_none() {
            missing.push("level 1 option");
        }
        if required >= 2 && self.level2.is_none() {
            missing.push("level 2 option");
        }
        if self.size.is_none() {
            missing.push("size");
        }
        missing
    }

    /// Stage derived from which fields are set.
    pub fn stage(&self) -> SelectionStage {
        if self.size.is_some() {
            SelectionStage::SizeChosen
        } else if self.level2.is_some() {
            SelectionStage::Level2Chosen
        } else if self.level1.is_some() {
            SelectionStage::Level1Chosen
        } else if self.product_type.is_some() {
            SelectionStage::TypeChosen
        } else {
            SelectionStage::Empty
        }
    }

    /// Whether `other` would be priced identically (quantity aside).
    pub fn same_priced_item(&self, other: &Selection) -> bool {
        self.product_type.as_ref().map(|pt| &pt.id) == other.product_type.as_ref().map(|pt| &pt.id)
            && self.level1.as_ref().map(|o| &o.id) == other.level1.as_ref().map(|o| &o.id)
            && self.level2.as_ref().map(|o| &o.id) == other.level2.as_ref().map(|o| &o.id)
            && self.size == other.size
    }
}

/// Parse quantity input from a form field.
pub fn parse_quantity(input: &str) -> Result<u32, ConfiguratorError> {
    let n: i64 = input
        .trim()
        .parse()
        .map_err(|_| ConfiguratorError::InvalidQuantity(input.trim().to_string()))?;
    validate_quantity(n)
}

pub(crate) fn validate_quantity(n: i64) -> Result<u32, ConfiguratorError> {
    if n < 1 {
        return Err(ConfiguratorError::InvalidQuantity(n.to_string()));
    }
    u32::try_from(n).map_err(|_| ConfiguratorError::InvalidQuantity(n.to_string()))
}
