//! Saved quotes, quote history, and the derived totals.
//!
//! A saved quote is an immutable snapshot of the basket plus customer and
//! metadata at export time. Totals are always derived from the subtotal;
//! history entries freeze the derived values so past quotes never change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::LineItem;

/// Fixed VAT rate applied to every quote.
pub const TAX_RATE: f64 = 0.18;

/// Derived monetary totals for a set of line items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl Totals {
    /// Derive tax and total from a subtotal. Tax is always
    /// `subtotal * TAX_RATE`, never stored independently.
    pub fn from_subtotal(subtotal: f64) -> Self {
        let tax = subtotal * TAX_RATE;
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    pub fn from_items(items: &[LineItem]) -> Self {
        Self::from_subtotal(items.iter().map(|i| i.effective_price()).sum())
    }
}

/// How a quote left the app.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportMethod {
    Download,
    Whatsapp,
    Email,
}

/// Workflow status of a saved quote.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Approved,
    Paid,
}

impl QuoteStatus {
    /// Parse from a user-facing string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(QuoteStatus::Draft),
            "sent" => Some(QuoteStatus::Sent),
            "approved" => Some(QuoteStatus::Approved),
            "paid" => Some(QuoteStatus::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Approved => "approved",
            QuoteStatus::Paid => "paid",
        };
        write!(f, "{}", s)
    }
}

/// Customer details attached to a quote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// An immutable snapshot of an exported quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedQuote {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub customer: CustomerInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Basket items at save time
    pub items: Vec<LineItem>,
    /// Totals frozen at save time
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_method: Option<ExportMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<QuoteStatus>,
}

impl SavedQuote {
    /// Snapshot the given items with derived totals frozen in.
    pub fn new(items: Vec<LineItem>) -> Self {
        let totals = Totals::from_items(&items);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            customer: CustomerInfo::default(),
            notes: None,
            items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            quote_number: None,
            export_method: None,
            status: None,
        }
    }

    pub fn with_customer(mut self, customer: CustomerInfo) -> Self {
        self.customer = customer;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_quote_number(mut self, number: u32) -> Self {
        self.quote_number = Some(number);
        self
    }

    pub fn with_export_method(mut self, method: ExportMethod) -> Self {
        self.export_method = Some(method);
        self
    }

    pub fn with_status(mut self, status: QuoteStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Ordered history of saved quotes, newest last.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct QuoteHistory {
    quotes: Vec<SavedQuote>,
}

impl QuoteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, quote: SavedQuote) {
        self.quotes.push(quote);
    }

    pub fn quotes(&self) -> &[SavedQuote] {
        &self.quotes
    }

    pub fn get(&self, id: Uuid) -> Option<&SavedQuote> {
        self.quotes.iter().find(|q| q.id == id)
    }

    /// Update the workflow status of a saved quote. Returns true on success.
    pub fn set_status(&mut self, id: Uuid, status: QuoteStatus) -> bool {
        match self.quotes.iter_mut().find(|q| q.id == id) {
            Some(quote) => {
                quote.status = Some(status);
                true
            }
            None => false,
        }
    }

    /// Remove a saved quote by id. Returns true if one was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.quotes.len();
        self.quotes.retain(|q| q.id != id);
        self.quotes.len() != before
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
