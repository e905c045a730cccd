//! Best-effort line items.

use super::amounts::{is_isolated, parse_amount};
use super::patterns::{LETTER, LINE_ITEM};
use crate::models::invoice::LineItem;

/// Every label + price pair, in line order then match order.
///
/// No filtering: totals, VAT and payment rows show up as items too.
pub fn extract_line_items(lines: &[String]) -> Vec<LineItem> {
    let mut items = Vec::new();

    for line in lines.iter().filter(|line| LETTER.is_match(line)) {
        for caps in LINE_ITEM.captures_iter(line) {
            let (Some(label), Some(price)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            if !is_isolated(line, price.start(), price.end()) {
                continue;
            }

            let label = label
                .as_str()
                .trim_end_matches(|c: char| c.is_whitespace() || c == ':' || c == '*')
                .trim();
            if label.is_empty() {
                continue;
            }

            if let Some(value) = parse_amount(price.as_str()) {
                items.push(LineItem::new(label, value));
            }
        }
    }

    items
}
