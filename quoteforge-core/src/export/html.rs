//! Printable document assembly.
//!
//! Produces a standalone HTML document sized for A4 with a fixed embedded
//! stylesheet, laid out right-to-left. The same document feeds both the
//! print path and the rasterized binary path.

use super::content::QuoteContent;

const STYLESHEET: &str = "\
@page { size: A4; margin: 15mm; }\n\
body { font-family: 'Heebo', 'Arial Hebrew', sans-serif; direction: rtl; margin: 0; color: #1a1a1a; }\n\
.page { width: 180mm; margin: 0 auto; }\n\
header { display: flex; justify-content: space-between; align-items: flex-start; border-bottom: 2px solid #2c3e50; padding-bottom: 8mm; }\n\
header h1 { font-size: 22pt; margin: 0; }\n\
.meta { font-size: 10pt; color: #555; }\n\
.logo { max-height: 60px; }\n\
table { width: 100%; border-collapse: collapse; margin-top: 6mm; }\n\
th { text-align: right; font-size: 10pt; border-bottom: 1px solid #2c3e50; padding: 2mm; }\n\
td { font-size: 10pt; border-bottom: 1px solid #ddd; padding: 2mm; vertical-align: top; }\n\
td.price { white-space: nowrap; }\n\
.totals { margin-top: 4mm; width: 60mm; margin-right: auto; font-size: 11pt; }\n\
.totals .grand { font-weight: bold; border-top: 1px solid #2c3e50; }\n\
.notes { margin-top: 8mm; font-size: 10pt; }\n\
.validity { margin-top: 2mm; font-size: 9pt; color: #555; }\n\
footer { margin-top: 14mm; display: flex; justify-content: space-between; font-size: 10pt; }\n\
.signature { border-top: 1px solid #1a1a1a; padding-top: 1mm; min-width: 50mm; text-align: center; }\n";

/// Escape text for safe embedding in HTML.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Assemble the fragments into a standalone printable HTML document.
pub fn render_printable(content: &QuoteContent) -> String {
    let mut doc = String::with_capacity(4096);
    doc.push_str("<!DOCTYPE html>\n<html dir=\"rtl\" lang=\"he\">\n<head>\n<meta charset=\"utf-8\">\n");
    doc.push_str(&format!("<title>{}</title>\n", escape(&content.header.title)));
    doc.push_str("<style>\n");
    doc.push_str(STYLESHEET);
    doc.push_str("</style>\n</head>\n<body>\n<div class=\"page\">\n");

    // Header block
    doc.push_str("<header>\n<div>\n");
    doc.push_str(&format!("<h1>{}</h1>\n", escape(&content.header.title)));
    doc.push_str(&format!(
        "<div class=\"meta\">{} · {}</div>\n",
        escape(&content.header.quote_label),
        escape(&content.header.date)
    ));
    doc.push_str(&format!(
        "<div><strong>{}</strong></div>\n",
        escape(&content.header.business_name)
    ));
    for line in &content.header.business_lines {
        doc.push_str(&format!("<div class=\"meta\">{}</div>\n", escape(line)));
    }
    doc.push_str("</div>\n");
    if let Some(logo) = &content.header.logo {
        // The logo is stored as base64 image data
        doc.push_str(&format!(
            "<img class=\"logo\" src=\"data:image/png;base64,{}\" alt=\"\">\n",
            logo
        ));
    }
    doc.push_str("</header>\n");

    // Line items table
    doc.push_str("<table>\n<thead><tr><th>פריט</th><th>קטגוריה</th><th>מחיר</th></tr></thead>\n<tbody>\n");
    for row in &content.rows {
        doc.push_str("<tr><td>");
        doc.push_str(&escape(&row.name));
        if let Some(description) = &row.description {
            doc.push_str(&format!(
                "<div class=\"meta\">{}</div>",
                escape(description)
            ));
        }
        doc.push_str(&format!(
            "</td><td>{}</td><td class=\"price\">{}</td></tr>\n",
            escape(&row.category),
            escape(&row.price_display)
        ));
    }
    doc.push_str("</tbody>\n</table>\n");

    // Totals
    doc.push_str("<table class=\"totals\">\n");
    doc.push_str(&format!(
        "<tr><td>סה\"כ לפני מע\"מ</td><td class=\"price\">{}</td></tr>\n",
        super::content::format_price(content.totals.subtotal)
    ));
    doc.push_str(&format!(
        "<tr><td>מע\"מ 18%</td><td class=\"price\">{}</td></tr>\n",
        super::content::format_price(content.totals.tax)
    ));
    doc.push_str(&format!(
        "<tr class=\"grand\"><td>סה\"כ לתשלום</td><td class=\"price\">{}</td></tr>\n",
        super::content::format_price(content.totals.total)
    ));
    doc.push_str("</table>\n");

    // Notes and validity
    if let Some(notes) = &content.notes.notes {
        doc.push_str(&format!("<div class=\"notes\">{}</div>\n", escape(notes)));
    }
    doc.push_str(&format!(
        "<div class=\"validity\">{}</div>\n",
        escape(&content.notes.validity_sentence)
    ));

    // Signature footer
    doc.push_str("<footer>\n");
    doc.push_str(&format!(
        "<div><div>{}</div>",
        escape(&content.footer.customer_name)
    ));
    if let Some(contact) = &content.footer.contact_line {
        doc.push_str(&format!("<div class=\"meta\">{}</div>", escape(contact)));
    }
    doc.push_str("</div>\n");
    doc.push_str(&format!(
        "<div class=\"signature\">{}</div>\n",
        escape(&content.footer.signature_label)
    ));
    doc.push_str("</footer>\n</div>\n</body>\n</html>\n");

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::content::{build_content, QuoteSnapshot};

    #[test]
    fn test_renders_standalone_document() {
        let content = build_content(&QuoteSnapshot::sample());
        let html = render_printable(&content);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("dir=\"rtl\""));
        assert!(html.contains("size: A4"));
        assert!(html.contains("אבי שיפוצים"));
        assert!(html.contains("#7"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_escapes_user_text() {
        let mut snapshot = QuoteSnapshot::sample();
        snapshot.notes = Some("<script>alert(1)</script>".to_string());

        let html = render_printable(&build_content(&snapshot));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_deterministic_output() {
        let content = build_content(&QuoteSnapshot::sample());
        assert_eq!(render_printable(&content), render_printable(&content));
    }

    #[test]
    fn test_contact_line_rendered_when_present() {
        let content = build_content(&QuoteSnapshot::sample());
        let html = render_printable(&content);
        assert!(html.contains("052-7654321"));
    }
}
