//! Per-service catalog price overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from service identifier to an override price.
///
/// Absence of a key means "use the catalog default". Negative prices are
/// never stored; clearing removes the key entirely rather than writing a
/// sentinel value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PriceOverrides {
    prices: BTreeMap<String, f64>,
}

impl PriceOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an override. Negative prices are silently rejected.
    pub fn set(&mut self, service_id: impl Into<String>, price: f64) {
        if price >= 0.0 {
            self.prices.insert(service_id.into(), price);
        }
    }

    /// Remove an override so the catalog default applies again.
    pub fn clear(&mut self, service_id: &str) {
        self.prices.remove(service_id);
    }

    pub fn get(&self, service_id: &str) -> Option<f64> {
        self.prices.get(service_id).copied()
    }

    /// The price to use for a service: the override when present,
    /// otherwise the catalog default.
    pub fn effective_price(&self, service_id: &str, catalog_price: f64) -> f64 {
        self.get(service_id).unwrap_or(catalog_price)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.prices.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
