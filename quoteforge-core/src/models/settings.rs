//! Per-user quote settings.

use serde::{Deserialize, Serialize};

/// Quote generation settings.
///
/// `next_quote_number` and `validity_days` are always at least 1; writes
/// with smaller values are silently rejected and the prior value is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteSettings {
    /// Default title for new quotes
    pub quote_title: String,
    /// Sequence number stamped on the next exported quote
    pub next_quote_number: u32,
    /// How many days a quote stays valid
    pub validity_days: u32,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            quote_title: "הצעת מחיר".to_string(),
            next_quote_number: 1,
            validity_days: 30,
        }
    }
}

impl QuoteSettings {
    /// Set the next quote number. Values below 1 are a no-op.
    pub fn set_next_quote_number(&mut self, number: u32) {
        if number >= 1 {
            self.next_quote_number = number;
        }
    }

    /// Set the validity period. Values below 1 are a no-op.
    pub fn set_validity_days(&mut self, days: u32) {
        if days >= 1 {
            self.validity_days = days;
        }
    }

    pub fn set_quote_title(&mut self, title: impl Into<String>) {
        self.quote_title = title.into();
    }

    /// Advance the sequence number after a successful export.
    pub fn bump_quote_number(&mut self) {
        self.next_quote_number = self.next_quote_number.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = QuoteSettings::default();
        assert_eq!(settings.next_quote_number, 1);
        assert_eq!(settings.validity_days, 30);
        assert!(!settings.quote_title.is_empty());
    }

    #[test]
    fn test_rejected_quote_number_write() {
        let mut settings = QuoteSettings::default();
        settings.set_next_quote_number(0);
        assert_eq!(settings.next_quote_number, 1);

        settings.set_next_quote_number(5);
        settings.set_next_quote_number(0);
        assert_eq!(settings.next_quote_number, 5);
    }

    #[test]
    fn test_rejected_validity_write() {
        let mut settings = QuoteSettings::default();
        settings.set_validity_days(0);
        assert_eq!(settings.validity_days, 30);

        settings.set_validity_days(14);
        assert_eq!(settings.validity_days, 14);
    }

    #[test]
    fn test_bump_quote_number() {
        let mut settings = QuoteSettings::default();
        settings.bump_quote_number();
        settings.bump_quote_number();
        assert_eq!(settings.next_quote_number, 3);
    }
}
