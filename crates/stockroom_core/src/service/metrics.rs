//! Aggregate metrics derived from a full listing.

use crate::model::item::InventoryItem;
use serde::Serialize;

/// Dashboard totals over the whole inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InventoryMetrics {
    /// Sum of all quantities.
    pub total_units: i64,
    /// Sum of `quantity * price`.
    pub total_value: f64,
    /// Items with `quantity < threshold`.
    pub low_stock_count: usize,
}

impl InventoryMetrics {
    /// Computes totals; an empty slice yields all zeros.
    pub fn from_items(items: &[InventoryItem], threshold: i64) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            total_units: acc.total_units.saturating_add(item.quantity),
            total_value: acc.total_value + item.value(),
            low_stock_count: acc.low_stock_count + usize::from(item.is_low_stock(threshold)),
        })
    }
}
