//! Proposal investment from its priced line items.

use super::types::LineItem;

/// Sum of `quantity * unit_price` over the whole item list.
///
/// Always recomputed from the full collection; the result replaces the
/// proposal's `total_investment` outright.
pub fn aggregate_line_items(items: &[LineItem]) -> f64 {
    items.iter().fold(0.0, |acc, item| acc + item.total_price())
}
