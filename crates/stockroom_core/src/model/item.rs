//! Stock item domain model.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another item.
//! - `name` is non-empty and unique; it never changes after creation.
//! - `quantity >= 0` and `price` is finite and `>= 0`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned surrogate key of an inventory row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Items with quantity strictly below this value count as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Validation failures for item fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemValidationError {
    EmptyName,
    NegativeQuantity(i64),
    /// Price is negative, NaN or infinite.
    InvalidPrice(f64),
    NegativeRestock(i64),
    /// Adding `delta` to `quantity` would exceed `i64::MAX`.
    QuantityOverflow { quantity: i64, delta: i64 },
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "item name cannot be empty"),
            Self::NegativeQuantity(value) => {
                write!(f, "quantity must be >= 0, got {value}")
            }
            Self::InvalidPrice(value) => {
                write!(f, "price must be a finite number >= 0, got {value}")
            }
            Self::NegativeRestock(value) => {
                write!(f, "restock amount must be >= 0, got {value}")
            }
            Self::QuantityOverflow { quantity, delta } => write!(
                f,
                "restocking {delta} units onto {quantity} exceeds the largest storable quantity"
            ),
        }
    }
}

impl Error for ItemValidationError {}

/// One persisted stock record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

impl InventoryItem {
    /// Stock value of this row (`quantity * price`).
    pub fn value(&self) -> f64 {
        self.quantity as f64 * self.price
    }

    /// Returns whether this row is below the given low-stock threshold.
    ///
    /// The comparison is strict: `quantity == threshold` is not low stock.
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.quantity < threshold
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_name(&self.name)?;
        validate_stock(self.quantity, self.price)
    }
}

/// Insert request for a new item; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

impl NewItem {
    pub fn new(name: impl Into<String>, quantity: i64, price: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
        }
    }

    /// Checks name and stock ranges.
    ///
    /// Names are validated as given; trimming is the caller's concern.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_name(&self.name)?;
        validate_stock(self.quantity, self.price)
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), ItemValidationError> {
    if name.trim().is_empty() {
        return Err(ItemValidationError::EmptyName);
    }
    Ok(())
}

/// Checks the mutable fields shared by insert and update paths.
pub fn validate_stock(quantity: i64, price: f64) -> Result<(), ItemValidationError> {
    if quantity < 0 {
        return Err(ItemValidationError::NegativeQuantity(quantity));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(ItemValidationError::InvalidPrice(price));
    }
    Ok(())
}
