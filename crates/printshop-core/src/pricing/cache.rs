//! Memoized unit prices.

use crate::money::Money;
use crate::pricing::PriceRequest;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Namespaced key builder, e.g. `cache_key!("price", id, "16x20")`.
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

/// Identifies a priced item: product type, options and size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceKey(String);

impl PriceKey {
    pub fn for_request(request: &PriceRequest) -> Self {
        let options = if request.options.is_empty() {
            "-".to_string()
        } else {
            request
                .options
                .iter()
                .map(|o| o.as_str())
                .collect::<Vec<_>>()
                .join("+")
        };
        Self(cache_key!(
            "price",
            request.product_type_id,
            options,
            format!("{}x{}", request.width, request.height)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unit prices already resolved in this process.
///
/// Cloning shares the underlying map, so one cache can back several
/// configurators.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    entries: Arc<Mutex<HashMap<PriceKey, Money>>>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PriceKey) -> Option<Money> {
        self.entries.lock().get(key).copied()
    }

    pub fn insert(&self, key: PriceKey, unit_price: Money) {
        self.entries.lock().insert(key, unit_price);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
