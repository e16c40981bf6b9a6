//! Print catalog module.
//!
//! Contains product types, sub-options, candidate sizes, the wire records
//! they are validated from, and the shared read-only index.

mod index;
mod option;
mod product_type;
mod records;
mod size;
mod source;

pub use index::CatalogIndex;
pub use option::{OptionKind, OptionLevel, SubOption};
pub use product_type::{OptionLevels, ProductType};
pub use records::{EnvelopeRecord, ProductTypeRecord, RecordError, SizeRecord, SubOptionRecord};
pub use size::{standard_sizes, Orientation, SizeOption};
pub use source::{CatalogSource, InMemoryCatalog};
