//! Terminal rendering helpers.

use stockroom_core::{InventoryItem, InventoryMetrics};
use tabled::settings::Style;
use tabled::{Table, Tabled};

const CURRENCY_SYMBOL: &str = "₹";

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl From<&InventoryItem> for ItemRow {
    fn from(item: &InventoryItem) -> Self {
        Self {
            id: item.id.0,
            name: item.name.clone(),
            quantity: format_units(item.quantity),
            price: format_money(item.price),
            value: format_money(item.value()),
        }
    }
}

/// Renders items as a bordered table.
pub fn item_table(items: &[InventoryItem]) -> String {
    Table::new(items.iter().map(ItemRow::from))
        .with(Style::rounded())
        .to_string()
}

/// Dashboard header lines for the summary command.
pub fn metrics_lines(metrics: &InventoryMetrics) -> [String; 3] {
    [
        format!("Total Stock Units:     {}", format_units(metrics.total_units)),
        format!("Total Inventory Value: {}", format_money(metrics.total_value)),
        format!("Low Stock Items:       {}", metrics.low_stock_count),
    ]
}

/// Formats an integer with `,` thousands separators.
pub fn format_units(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Formats an amount with currency symbol, separators and two decimals.
pub fn format_money(value: f64) -> String {
    let cents = (value * 100.0).round();
    if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
        return format!("{CURRENCY_SYMBOL}{value:.2}");
    }
    let cents = cents as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = i64::try_from(cents / 100).unwrap_or(i64::MAX);
    format!(
        "{sign}{CURRENCY_SYMBOL}{}.{:02}",
        format_units(whole),
        cents % 100
    )
}
