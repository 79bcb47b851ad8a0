//! # Print Document
//!
//! Renders a receipt as a standalone HTML document. The same document is
//! written for the print path and handed to the PDF converter.
//!
//! ## Layout
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  BUSINESS NAME                          Date     07/03/2024  │
//! │  Official receipt from <owner>          Bus. no  514-22      │
//! │  Phone                                  Receipt  112         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  To: <client>                                                │
//! ├──────────────┬──────┬────────────┬───────────────────────────┤
//! │  Description │ Qty  │ Unit price │ Line total                │
//! ├──────────────┴──────┴────────────┴───────────────────────────┤
//! │                                        Total due  59.97 ₪    │
//! │  Signature [img | "No signature on file"]                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Text from records is HTML-escaped. The signature is used verbatim as an
//! `<img src>` because it is a `data:` URL produced by signature capture.

use crate::money::Money;
use crate::types::{BusinessSettings, Receipt};

const BUSINESS_NAME_PLACEHOLDER: &str = "Business name";
const CLIENT_PLACEHOLDER: &str = "No client name";
const NO_ITEMS_PLACEHOLDER: &str = "No items";
const EMPTY_DESCRIPTION: &str = "—";
const NO_SIGNATURE: &str = "No signature on file";

const STYLE: &str = r#"
    * { box-sizing: border-box; }
    body { margin: 0; padding: 24px 0; font-family: system-ui, sans-serif; color: #111; background: #f2f2f2; }
    .receipt { max-width: 800px; margin: 0 auto; background: #fff; border: 1px solid #d4d4d4; border-radius: 12px; padding: 24px 32px 32px; }
    .receipt-header { display: flex; justify-content: space-between; border-bottom: 1px solid #d4d4d4; padding-bottom: 16px; margin-bottom: 16px; }
    .meta-label { color: #6b7280; margin-right: 8px; }
    .muted { color: #9ca3af; }
    table { width: 100%; border-collapse: collapse; margin-top: 12px; }
    th, td { border-bottom: 1px solid #e5e7eb; padding: 8px; text-align: left; }
    td.numeric, th.numeric { text-align: right; }
    .total-box { text-align: right; font-size: 1.2rem; font-weight: bold; margin-top: 16px; }
    .signature-box { margin-top: 32px; }
    .signature-box img { max-width: 240px; }
    @media print { body { background: #fff; padding: 0; } .receipt { border: none; } }
"#;

// =============================================================================
// Public API
// =============================================================================

/// Renders the printable document for `receipt` using the current settings.
///
/// The business identity block comes from `settings`; the signature follows
/// [`resolve_signature`].
pub fn render_print_document(
    receipt: &Receipt,
    settings: &BusinessSettings,
    currency_symbol: &str,
) -> String {
    let business_name = non_empty(&settings.business_name).unwrap_or(BUSINESS_NAME_PLACEHOLDER);
    let issuer = non_empty(&settings.owner_name).unwrap_or(business_name);
    let display_date = format_display_date(&receipt.date);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\" />\n");
    html.push_str(&format!(
        "<title>Receipt {}</title>\n",
        receipt.receipt_number
    ));
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n<div class=\"receipt\">\n");

    // Business identity and metadata
    html.push_str("<div class=\"receipt-header\">\n<div>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(business_name)));
    html.push_str(&format!(
        "<p>Official receipt from <strong>{}</strong></p>\n",
        escape_html(issuer)
    ));
    if let Some(phone) = non_empty(&settings.phone) {
        html.push_str(&format!("<div>Phone: {}</div>\n", escape_html(phone)));
    }
    html.push_str("</div>\n<div class=\"receipt-meta\">\n");
    html.push_str(&meta_row("Date", &display_date));
    if let Some(number) = non_empty(&settings.business_number) {
        html.push_str(&meta_row("Business no.", number));
    }
    html.push_str(&meta_row("Receipt no.", &receipt.receipt_number.to_string()));
    html.push_str("</div>\n</div>\n");

    // Client
    html.push_str("<div class=\"to-box\"><span class=\"meta-label\">To</span>");
    match non_empty(&receipt.to) {
        Some(client) => html.push_str(&format!(
            "<span class=\"client-name\">{}</span>",
            escape_html(client)
        )),
        None => html.push_str(&format!("<span class=\"muted\">{}</span>", CLIENT_PLACEHOLDER)),
    }
    html.push_str("</div>\n");

    // Line items
    html.push_str("<table>\n<thead>\n<tr>");
    html.push_str("<th>Description</th><th class=\"numeric\">Qty</th>");
    html.push_str("<th class=\"numeric\">Unit price</th><th class=\"numeric\">Line total</th>");
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    if receipt.line_items.is_empty() {
        html.push_str(&format!(
            "<tr><td colspan=\"4\" class=\"muted\">{}</td></tr>\n",
            NO_ITEMS_PLACEHOLDER
        ));
    }
    for item in &receipt.line_items {
        let description = match non_empty(&item.description) {
            Some(d) => escape_html(d),
            None => format!("<span class=\"muted\">{}</span>", EMPTY_DESCRIPTION),
        };
        html.push_str("<tr>");
        html.push_str(&format!("<td>{}</td>", description));
        html.push_str(&format!("<td class=\"numeric\">{}</td>", item.qty));
        html.push_str(&format!(
            "<td class=\"numeric\">{}</td>",
            format_amount(item.unit_price, currency_symbol)
        ));
        html.push_str(&format!(
            "<td class=\"numeric\">{}</td>",
            format_amount(item.total, currency_symbol)
        ));
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");

    // Grand total
    html.push_str(&format!(
        "<div class=\"total-box\">Total due <span class=\"grand-total\">{}</span></div>\n",
        format_amount(receipt.total, currency_symbol)
    ));

    // Signature
    html.push_str("<div class=\"signature-box\">\n<div class=\"meta-label\">Business signature</div>\n");
    match resolve_signature(receipt, settings) {
        Some(src) => html.push_str(&format!(
            "<img src=\"{}\" alt=\"Signature\" />\n",
            escape_html(src)
        )),
        None => html.push_str(&format!("<span class=\"muted\">{}</span>\n", NO_SIGNATURE)),
    }
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<footer class=\"muted\">Receipt no. {} &middot; {}</footer>\n",
        receipt.receipt_number,
        escape_html(business_name)
    ));
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// Picks the signature to print: the current settings, then the receipt's
/// own copy, then its settings snapshot.
pub fn resolve_signature<'a>(receipt: &'a Receipt, settings: &'a BusinessSettings) -> Option<&'a str> {
    settings
        .signature_data_url
        .as_deref()
        .and_then(non_empty)
        .or_else(|| receipt.signature_data_url.as_deref().and_then(non_empty))
        .or_else(|| {
            receipt
                .settings_snapshot
                .as_ref()
                .and_then(|s| s.signature_data_url.as_deref())
                .and_then(non_empty)
        })
}

/// `YYYY-MM-DD` becomes `DD/MM/YYYY`, with day and month padded to two
/// digits. Anything else is returned unchanged.
pub fn format_display_date(date: &str) -> String {
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [y, m, d] if !y.is_empty() && !m.is_empty() && !d.is_empty() => {
            format!("{:0>2}/{:0>2}/{}", d, m, y)
        }
        _ => date.to_string(),
    }
}

/// `59.97 ₪`
pub fn format_amount(amount: f64, currency_symbol: &str) -> String {
    format!("{} {}", Money::from_amount(amount), currency_symbol)
}

// =============================================================================
// Helpers
// =============================================================================

fn meta_row(label: &str, value: &str) -> String {
    format!(
        "<div class=\"meta-row\"><span class=\"meta-label\">{}</span><span class=\"meta-value\">{}</span></div>\n",
        label,
        escape_html(value)
    )
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineItem;
    use chrono::NaiveDate;

    fn settings() -> BusinessSettings {
        BusinessSettings {
            business_name: "Dana's Bakery".into(),
            owner_name: "Dana".into(),
            phone: "050-1234567".into(),
            business_number: "514-22".into(),
            default_receipt_number: None,
            signature_data_url: None,
        }
    }

    fn receipt() -> Receipt {
        let mut r = Receipt::draft(112, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        r.to = "Noa <VIP>".into();
        r.line_items = vec![LineItem::new("Sourdough", 3.0, 19.99)];
        r.refresh_totals();
        r
    }

    #[test]
    fn test_document_contains_required_blocks() {
        let html = render_print_document(&receipt(), &settings(), "₪");

        assert!(html.contains("Dana&#39;s Bakery"));
        assert!(html.contains("514-22"));
        assert!(html.contains("050-1234567"));
        assert!(html.contains("07/03/2024"));
        assert!(html.contains("Receipt no."));
        assert!(html.contains("112"));
        assert!(html.contains("Noa &lt;VIP&gt;"));
        assert!(html.contains("Sourdough"));
        assert!(html.contains("<td class=\"numeric\">3</td>"));
        assert!(html.contains("19.99 ₪"));
        assert!(html.contains("59.97 ₪"));
        assert!(html.contains(NO_SIGNATURE));
    }

    #[test]
    fn test_placeholders() {
        let mut r = receipt();
        r.to.clear();
        r.line_items.clear();
        r.refresh_totals();
        let html = render_print_document(&r, &BusinessSettings::default(), "$");

        assert!(html.contains(BUSINESS_NAME_PLACEHOLDER));
        assert!(html.contains(CLIENT_PLACEHOLDER));
        assert!(html.contains(NO_ITEMS_PLACEHOLDER));
        assert!(html.contains("0.00 $"));
        assert!(!html.contains("Business no."));
    }

    #[test]
    fn test_empty_description_dash() {
        let mut r = receipt();
        r.line_items.push(LineItem::new("", 1.0, 5.0));
        let html = render_print_document(&r, &settings(), "₪");
        assert!(html.contains(EMPTY_DESCRIPTION));
    }

    #[test]
    fn test_signature_precedence() {
        let mut r = receipt();
        let mut s = settings();
        assert_eq!(resolve_signature(&r, &s), None);

        r.settings_snapshot = Some(BusinessSettings {
            signature_data_url: Some("data:snapshot".into()),
            ..Default::default()
        });
        assert_eq!(resolve_signature(&r, &s), Some("data:snapshot"));

        r.signature_data_url = Some("data:receipt".into());
        assert_eq!(resolve_signature(&r, &s), Some("data:receipt"));

        s.signature_data_url = Some("data:settings".into());
        assert_eq!(resolve_signature(&r, &s), Some("data:settings"));

        let html = render_print_document(&r, &s, "₪");
        assert!(html.contains("<img src=\"data:settings\""));
    }

    #[test]
    fn test_format_display_date() {
        assert_eq!(format_display_date("2024-03-07"), "07/03/2024");
        assert_eq!(format_display_date("2024-3-7"), "07/03/2024");
        assert_eq!(format_display_date("2024-11-5"), "05/11/2024");
        assert_eq!(format_display_date(""), "");
        assert_eq!(format_display_date("March 7"), "March 7");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(59.97, "₪"), "59.97 ₪");
        assert_eq!(format_amount(5.0, "$"), "5.00 $");
    }
}
