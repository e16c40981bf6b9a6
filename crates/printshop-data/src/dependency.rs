//! Dependency tagging for outbound calls.

use std::fmt;
use std::time::Duration;

/// Which upstream endpoint family a call belongs to.
///
/// Each tag carries a default timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTag {
    /// Product types and sub-options.
    Catalog,
    /// Per-product size lists.
    Sizes,
    /// Retail price lookups.
    Pricing,
}

impl DependencyTag {
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::Catalog => Duration::from_millis(5_000),
            Self::Sizes => Duration::from_millis(3_000),
            Self::Pricing => Duration::from_millis(10_000),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Sizes => "sizes",
            Self::Pricing => "pricing",
        }
    }
}

impl fmt::Display for DependencyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
