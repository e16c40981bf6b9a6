//! Sub-option types (frame colors, paper finishes, frame depths).

use crate::ids::{OptionId, ProductTypeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which sub-option step an option belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLevel {
    One,
    Two,
}

impl OptionLevel {
    pub fn number(&self) -> u8 {
        match self {
            OptionLevel::One => 1,
            OptionLevel::Two => 2,
        }
    }
}

impl fmt::Display for OptionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {}", self.number())
    }
}

/// Presentation hint for a group of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OptionKind {
    /// Rendered as an image/color swatch grid.
    Swatch,
    /// Rendered as a plain list.
    #[default]
    List,
}

impl OptionKind {
    /// Derive the presentation from the catalog's kind tag
    /// (e.g. "frame_color", "swatch", "paper").
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        if tag == "swatch" || tag == "color" || tag.ends_with("_color") || tag.ends_with("_colour")
        {
            OptionKind::Swatch
        } else {
            OptionKind::List
        }
    }
}

/// A selectable modifier at level 1 or level 2.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubOption {
    /// Option identifier.
    pub id: OptionId,
    /// Display value.
    pub name: String,
    /// Owning product type.
    pub product_type_id: ProductTypeId,
    /// Step this option is chosen at.
    pub level: OptionLevel,
    /// Raw kind tag from the catalog.
    pub kind_tag: String,
    /// Presentation derived from `kind_tag`.
    pub kind: OptionKind,
    /// Swatch or preview image.
    pub image_url: Option<String>,
    /// Level-1 option this level-2 option was offered under.
    pub parent_id: Option<OptionId>,
}

impl SubOption {
    /// Whether this option may be chosen under the given level-1 option.
    pub fn is_offered_under(&self, parent: &OptionId) -> bool {
        self.parent_id.as_ref().map_or(true, |p| p == parent)
    }
}
