//! Product type definitions.

use crate::envelope::Envelope;
use crate::ids::ProductTypeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many sub-option steps precede size selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OptionLevels {
    /// Size can be chosen right after the product type.
    None,
    /// One sub-option (e.g. a paper finish).
    One,
    /// Two dependent sub-options (e.g. frame depth, then frame color).
    Two,
}

impl OptionLevels {
    pub fn count(&self) -> u8 {
        match self {
            OptionLevels::None => 0,
            OptionLevels::One => 1,
            OptionLevels::Two => 2,
        }
    }

    pub fn from_count(count: i64) -> Option<Self> {
        match count {
            0 => Some(OptionLevels::None),
            1 => Some(OptionLevels::One),
            2 => Some(OptionLevels::Two),
            _ => None,
        }
    }
}

impl TryFrom<u8> for OptionLevels {
    type Error = String;

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        Self::from_count(i64::from(count))
            .ok_or_else(|| format!("option level count must be 0, 1 or 2, got {}", count))
    }
}

impl From<OptionLevels> for u8 {
    fn from(levels: OptionLevels) -> u8 {
        levels.count()
    }
}

/// A printable product family (e.g. "Stretched Canvas 0.75in").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductType {
    /// Stable identifier.
    pub id: ProductTypeId,
    /// Display name.
    pub name: String,
    /// Number of sub-option steps before size selection.
    pub option_levels: OptionLevels,
    /// Printable size range.
    pub envelope: Envelope,
}

impl ProductType {
    pub fn new(
        id: impl Into<ProductTypeId>,
        name: impl Into<String>,
        option_levels: OptionLevels,
        envelope: Envelope,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            option_levels,
            envelope,
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_levels_from_count() {
        assert_eq!(OptionLevels::from_count(0), Some(OptionLevels::None));
        assert_eq!(OptionLevels::from_count(2), Some(OptionLevels::Two));
        assert_eq!(OptionLevels::from_count(3), None);
        assert_eq!(OptionLevels::from_count(-1), None);
    }

    #[test]
    fn test_option_levels_serde() {
        let levels: OptionLevels = serde_json::from_str("2").unwrap();
        assert_eq!(levels, OptionLevels::Two);
        assert_eq!(serde_json::to_string(&OptionLevels::One).unwrap(), "1");
        assert!(serde_json::from_str::<OptionLevels>("5").is_err());
    }
}
