//! Line items and the working basket.
//!
//! A basket is the ordered set of services currently being quoted. Each
//! line item carries a base price, optional extras, and an optional manual
//! override that replaces the computed price entirely.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A named add-on charge attached to a line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Extra {
    /// Label shown next to the item name
    pub text: String,
    /// Add-on price, always non-negative
    pub price: f64,
}

impl Extra {
    /// Create a new extra. Negative prices are clamped to zero.
    pub fn new(text: impl Into<String>, price: f64) -> Self {
        Self {
            text: text.into(),
            price: price.max(0.0),
        }
    }
}

/// One quoted service or product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub id: Uuid,
    pub name: String,
    /// Category label shown in the quote table
    pub category: String,
    /// Base catalog price, always non-negative
    pub base_price: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<Extra>,
    /// Manual price override. Absent means "use the computed price".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LineItem {
    /// Create a new line item. Negative base prices are clamped to zero.
    pub fn new(name: impl Into<String>, category: impl Into<String>, base_price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category: category.into(),
            base_price: base_price.max(0.0),
            extras: Vec::new(),
            override_price: None,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_extras(mut self, extras: Vec<Extra>) -> Self {
        self.extras = extras;
        self
    }

    /// Base price plus the sum of all extras.
    pub fn computed_price(&self) -> f64 {
        self.base_price + self.extras.iter().map(|e| e.price).sum::<f64>()
    }

    /// The final price for this item: the override when one is set (and
    /// non-negative), otherwise the computed price.
    pub fn effective_price(&self) -> f64 {
        match self.override_price {
            Some(p) if p >= 0.0 => p,
            _ => self.computed_price(),
        }
    }

    pub fn add_extra(&mut self, extra: Extra) {
        self.extras.push(extra);
    }

    /// Remove an extra by label. Returns true if one was removed.
    pub fn remove_extra(&mut self, text: &str) -> bool {
        let before = self.extras.len();
        self.extras.retain(|e| e.text != text);
        self.extras.len() != before
    }

    /// Set or clear the manual override.
    ///
    /// Negative values are silently rejected (the prior state is kept).
    /// `None`, or a value equal to the computed price, removes the override
    /// entirely so that the serialized item carries no stale key.
    pub fn set_override(&mut self, price: Option<f64>) {
        match price {
            None => self.override_price = None,
            Some(p) if p < 0.0 => {}
            Some(p) if (p - self.computed_price()).abs() < f64::EPSILON => {
                self.override_price = None;
            }
            Some(p) => self.override_price = Some(p),
        }
    }

    pub fn clear_override(&mut self) {
        self.override_price = None;
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {:.2}", self.name, self.category, self.effective_price())
    }
}

/// The ordered working basket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Basket {
    items: Vec<LineItem>,
}

impl Basket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: LineItem) {
        self.items.push(item);
    }

    /// Remove an item by id. Returns true if one was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    pub fn get(&self, id: Uuid) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clear the basket (the basket itself stays, only its items go).
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of effective prices over all items.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(|i| i.effective_price()).sum()
    }
}

impl FromIterator<LineItem> for Basket {
    fn from_iter<T: IntoIterator<Item = LineItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price_computed() {
        let mut item = LineItem::new("Paint job", "Painting", 100.0);
        item.add_extra(Extra::new("primer", 20.0));
        item.add_extra(Extra::new("scaffolding", 30.0));
        assert_eq!(item.effective_price(), 150.0);
    }

    #[test]
    fn test_effective_price_override_wins() {
        let mut item = LineItem::new("Paint job", "Painting", 100.0);
        item.add_extra(Extra::new("primer", 20.0));
        item.set_override(Some(90.0));
        assert_eq!(item.effective_price(), 90.0);
    }

    #[test]
    fn test_effective_price_invariant_over_mutations() {
        let mut item = LineItem::new("Install", "Electric", 200.0);

        item.add_extra(Extra::new("cabling", 50.0));
        assert_eq!(item.effective_price(), 250.0);

        item.set_override(Some(230.0));
        assert_eq!(item.effective_price(), 230.0);

        item.remove_extra("cabling");
        assert_eq!(item.effective_price(), 230.0);

        item.clear_override();
        assert_eq!(item.effective_price(), 200.0);
    }

    #[test]
    fn test_negative_override_rejected() {
        let mut item = LineItem::new("Paint job", "Painting", 100.0);
        item.set_override(Some(-5.0));
        assert!(item.override_price.is_none());

        item.set_override(Some(80.0));
        item.set_override(Some(-1.0));
        assert_eq!(item.override_price, Some(80.0));
    }

    #[test]
    fn test_override_equal_to_computed_clears() {
        let mut item = LineItem::new("Paint job", "Painting", 100.0);
        item.add_extra(Extra::new("primer", 20.0));
        item.set_override(Some(120.0));
        assert!(item.override_price.is_none());
    }

    #[test]
    fn test_cleared_override_absent_in_json() {
        let mut item = LineItem::new("Paint job", "Painting", 100.0);
        item.set_override(Some(80.0));
        item.set_override(None);

        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("override_price").is_none());
    }

    #[test]
    fn test_basket_subtotal_scenario() {
        let mut basket = Basket::new();

        let mut a = LineItem::new("a", "cat", 100.0);
        a.add_extra(Extra::new("x", 20.0));
        basket.add(a);

        let mut b = LineItem::new("b", "cat", 50.0);
        b.set_override(Some(40.0));
        basket.add(b);

        assert_eq!(basket.subtotal(), 160.0);
    }

    #[test]
    fn test_basket_remove_and_clear() {
        let mut basket = Basket::new();
        let item = LineItem::new("a", "cat", 10.0);
        let id = item.id;
        basket.add(item);
        basket.add(LineItem::new("b", "cat", 20.0));

        assert!(basket.remove(id));
        assert!(!basket.remove(id));
        assert_eq!(basket.len(), 1);

        basket.clear();
        assert!(basket.is_empty());
    }

    #[test]
    fn test_basket_json_roundtrip() {
        let mut basket = Basket::new();
        basket.add(LineItem::new("a", "cat", 10.5).with_description("notes"));

        let json = serde_json::to_string(&basket).unwrap();
        let parsed: Basket = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, basket);
        // Transparent newtype: serializes as a bare array
        assert!(json.starts_with('['));
    }
}
