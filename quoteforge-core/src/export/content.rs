//! Content construction: snapshot in, structured fragments out.
//!
//! `build_content` is a pure function: the same snapshot always produces
//! byte-identical fragments, which is what makes the rendered document
//! testable without a rasterizer.

use chrono::NaiveDate;

use crate::models::{BusinessProfile, CustomerInfo, LineItem, Totals};

/// Validity period used when the caller supplies none or a value below 1.
pub const DEFAULT_VALIDITY_DAYS: u32 = 30;

/// Placeholder for an absent customer name; never an empty string, so the
/// signature line does not look blank.
const CUSTOMER_PLACEHOLDER: &str = "—";

/// Everything the pipeline needs to render one quote.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSnapshot {
    pub items: Vec<LineItem>,
    pub profile: BusinessProfile,
    pub customer: CustomerInfo,
    pub notes: Option<String>,
    pub title: String,
    pub quote_number: u32,
    pub validity_days: Option<u32>,
    pub issued_on: NaiveDate,
}

/// Header: business identity, quote number, and issue date.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderBlock {
    pub title: String,
    /// Sequence label, e.g. `#7`
    pub quote_label: String,
    pub date: String,
    pub business_name: String,
    /// Secondary identity lines, in display order
    pub business_lines: Vec<String>,
    pub logo: Option<String>,
}

/// One row of the line-items table.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRow {
    /// Item name, with the extras suffix when applicable
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: f64,
    pub price_display: String,
}

/// Free-text notes plus the validity sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct NotesBlock {
    pub notes: Option<String>,
    pub validity_sentence: String,
}

/// Customer signature block.
#[derive(Debug, Clone, PartialEq)]
pub struct FooterBlock {
    pub customer_name: String,
    /// Secondary contact line: phone, else address, else email
    pub contact_line: Option<String>,
    pub signature_label: String,
}

/// The four structured fragments plus derived totals.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteContent {
    pub header: HeaderBlock,
    pub rows: Vec<QuoteRow>,
    pub notes: NotesBlock,
    pub footer: FooterBlock,
    pub totals: Totals,
}

/// Format a monetary figure for display. Full precision is stored; only
/// rendering rounds to two digits.
pub(crate) fn format_price(value: f64) -> String {
    format!("₪{:.2}", value)
}

/// Build the structured fragments for a snapshot. Pure and deterministic.
pub fn build_content(snapshot: &QuoteSnapshot) -> QuoteContent {
    let header = build_header(snapshot);
    let rows = snapshot.items.iter().map(build_row).collect();
    let notes = build_notes(snapshot);
    let footer = build_footer(&snapshot.customer);
    let totals = Totals::from_items(&snapshot.items);

    QuoteContent {
        header,
        rows,
        notes,
        footer,
        totals,
    }
}

fn build_header(snapshot: &QuoteSnapshot) -> HeaderBlock {
    let profile = &snapshot.profile;
    let mut business_lines = Vec::new();

    if let Some(contact) = non_empty(profile.contact_name.as_deref()) {
        business_lines.push(contact.to_string());
    }
    if let Some(company_id) = non_empty(profile.company_id.as_deref()) {
        business_lines.push(format!("ח.פ. {}", company_id));
    }
    if !profile.phone.is_empty() {
        business_lines.push(profile.phone.clone());
    }
    if let Some(email) = non_empty(profile.email.as_deref()) {
        business_lines.push(email.to_string());
    }
    if let Some(address) = non_empty(profile.address.as_deref()) {
        business_lines.push(address.to_string());
    }

    HeaderBlock {
        title: snapshot.title.clone(),
        quote_label: format!("#{}", snapshot.quote_number),
        date: snapshot.issued_on.format("%d/%m/%Y").to_string(),
        business_name: profile.business_name.clone(),
        business_lines,
        logo: profile.logo.clone(),
    }
}

fn build_row(item: &LineItem) -> QuoteRow {
    // With a manual override the extras breakdown is suppressed: the
    // override already encodes the final figure, and listing extras
    // alongside it would mislead the reader.
    let name = if item.override_price.is_none() && !item.extras.is_empty() {
        let suffix: Vec<String> = item.extras.iter().map(|e| format!("+ {}", e.text)).collect();
        format!("{} {}", item.name, suffix.join(", "))
    } else {
        item.name.clone()
    };

    let price = item.effective_price();
    QuoteRow {
        name,
        category: item.category.clone(),
        description: item.description.clone(),
        price,
        price_display: format_price(price),
    }
}

fn build_notes(snapshot: &QuoteSnapshot) -> NotesBlock {
    let days = match snapshot.validity_days {
        Some(d) if d >= 1 => d,
        _ => DEFAULT_VALIDITY_DAYS,
    };

    NotesBlock {
        notes: snapshot.notes.clone().filter(|n| !n.is_empty()),
        validity_sentence: format!("הצעת המחיר בתוקף ל-{} ימים מיום הנפקתה", days),
    }
}

fn build_footer(customer: &CustomerInfo) -> FooterBlock {
    let customer_name = match non_empty(customer.name.as_deref()) {
        Some(name) => name.to_string(),
        None => CUSTOMER_PLACEHOLDER.to_string(),
    };

    // Phone first, then address; email only when neither is present.
    let contact_line = non_empty(customer.phone.as_deref())
        .or_else(|| non_empty(customer.address.as_deref()))
        .or_else(|| non_empty(customer.email.as_deref()))
        .map(str::to_string);

    FooterBlock {
        customer_name,
        contact_line,
        signature_label: "חתימת הלקוח".to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
impl QuoteSnapshot {
    /// A small deterministic snapshot shared by pipeline tests.
    pub(crate) fn sample() -> Self {
        let mut item = LineItem::new("צביעת דירה", "צבע", 100.0);
        item.add_extra(crate::models::Extra::new("פריימר", 20.0));

        QuoteSnapshot {
            items: vec![item],
            profile: BusinessProfile::new("אבי שיפוצים", "050-1234567"),
            customer: CustomerInfo {
                name: Some("דנה לוי".to_string()),
                phone: Some("052-7654321".to_string()),
                ..CustomerInfo::default()
            },
            notes: Some("כולל חומרים".to_string()),
            title: "הצעת מחיר".to_string(),
            quote_number: 7,
            validity_days: Some(30),
            issued_on: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
        }
    }
}
