//! Catalog wire records and their validation.
//!
//! Payloads from the catalog collaborator are deserialized into these loose
//! records and converted into domain types here, so malformed entries are
//! rejected at the fetch boundary.

use crate::catalog::{OptionKind, OptionLevel, OptionLevels, ProductType, SizeOption, SubOption};
use crate::envelope::{Envelope, EnvelopeError};
use crate::ids::{OptionId, ProductTypeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a catalog record was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("record has an empty id")]
    EmptyId,

    #[error("product type {id}: option level count {count} is not 0, 1 or 2")]
    OptionLevelCount { id: String, count: i64 },

    #[error("product type {id}: {source}")]
    Envelope {
        id: String,
        #[source]
        source: EnvelopeError,
    },

    #[error("size {width}x{height} is not a positive size")]
    Size { width: f64, height: f64 },
}

/// `{id, name, optionLevelCount, envelope}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductTypeRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub option_level_count: i64,
    pub envelope: EnvelopeRecord,
}

/// `{minW, maxW, minH, maxH}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeRecord {
    #[serde(rename = "minW")]
    pub min_w: f64,
    #[serde(rename = "maxW")]
    pub max_w: f64,
    #[serde(rename = "minH")]
    pub min_h: f64,
    #[serde(rename = "maxH")]
    pub max_h: f64,
}

/// `{id, name, kind}` with an optional image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubOptionRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl SubOptionRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            image_url: None,
        }
    }

    /// Validate in the context the record was fetched for.
    pub fn into_option(
        self,
        product_type_id: &ProductTypeId,
        level: OptionLevel,
        parent: Option<&OptionId>,
    ) -> Result<SubOption, RecordError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(RecordError::EmptyId);
        }
        let name = display_name(&self.name, id);
        let image_url = self.image_url.filter(|url| !url.trim().is_empty());

        Ok(SubOption {
            id: OptionId::new(id),
            name,
            product_type_id: product_type_id.clone(),
            level,
            kind: OptionKind::from_tag(&self.kind),
            kind_tag: self.kind,
            image_url,
            parent_id: parent.cloned(),
        })
    }
}

/// `{width, height}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SizeRecord {
    pub width: f64,
    pub height: f64,
}

impl TryFrom<SizeRecord> for SizeOption {
    type Error = RecordError;

    fn try_from(record: SizeRecord) -> Result<Self, Self::Error> {
        SizeOption::new(record.width, record.height).map_err(|_| RecordError::Size {
            width: record.width,
            height: record.height,
        })
    }
}

impl TryFrom<ProductTypeRecord> for ProductType {
    type Error = RecordError;

    fn try_from(record: ProductTypeRecord) -> Result<Self, Self::Error> {
        let id = record.id.trim();
        if id.is_empty() {
            return Err(RecordError::EmptyId);
        }

        let option_levels = OptionLevels::from_count(record.option_level_count).ok_or_else(|| {
            RecordError::OptionLevelCount {
                id: id.to_string(),
                count: record.option_level_count,
            }
        })?;

        let e = record.envelope;
        let envelope = Envelope::new(e.min_w, e.max_w, e.min_h, e.max_h).map_err(|source| {
            RecordError::Envelope {
                id: id.to_string(),
                source,
            }
        })?;

        Ok(ProductType::new(
            id,
            display_name(&record.name, id),
            option_levels,
            envelope,
        ))
    }
}

/// Blank names fall back to the id.
fn display_name(name: &str, id: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        id.to_string()
    } else {
        name.to_string()
    }
}
