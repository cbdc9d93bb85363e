//! Shared import rules for every tabular source.
//!
//! # Responsibility
//! - Locate the required columns in a header row.
//! - Turn one data row into a validated `NewItem`.
//!
//! # Invariants
//! - Header names are matched exactly and case-sensitively.
//! - A row either yields a valid `NewItem` or an `InvalidRow` naming its line.

use crate::model::item::NewItem;
use crate::repo::item_repo::RepoError;
use csv::StringRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Header names required in an import file, matched case-sensitively.
pub const IMPORT_COLUMNS: [&str; 3] = ["Name", "Quantity", "Price"];

/// Failure while importing a tabular file.
#[derive(Debug)]
pub enum ImportError {
    /// One or more required header columns are absent.
    MissingColumns(Vec<&'static str>),
    /// A data row holds a missing, non-numeric or out-of-range value.
    InvalidRow { line: u64, message: String },
    Csv(csv::Error),
    /// The workbook cannot be opened or has no worksheet.
    Spreadsheet(String),
    /// Storage failed part-way; rows inserted before the failure remain.
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumns(columns) => write!(
                f,
                "import file must have columns: {} (missing: {})",
                IMPORT_COLUMNS.join(", "),
                columns.join(", ")
            ),
            Self::InvalidRow { line, message } => write!(f, "line {line}: {message}"),
            Self::Csv(err) => write!(f, "failed to read CSV: {err}"),
            Self::Spreadsheet(message) => write!(f, "failed to read workbook: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::MissingColumns(_) | Self::InvalidRow { .. } | Self::Spreadsheet(_) => None,
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of a completed import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Data rows read from the file.
    pub rows: usize,
    /// Rows that became new items.
    pub added: usize,
    /// Names skipped because an item with that name already existed.
    pub duplicates: Vec<String>,
}

/// Positions of the required columns within a header row.
pub(crate) struct ColumnIndex {
    name: usize,
    quantity: usize,
    price: usize,
}

impl ColumnIndex {
    pub(crate) fn resolve(headers: &StringRecord) -> Result<Self, ImportError> {
        let position = |column: &str| headers.iter().position(|header| header == column);
        let found = IMPORT_COLUMNS.map(position);

        let missing = IMPORT_COLUMNS
            .iter()
            .zip(found.iter())
            .filter(|(_, index)| index.is_none())
            .map(|(column, _)| *column)
            .collect::<Vec<_>>();

        match found {
            [Some(name), Some(quantity), Some(price)] => Ok(Self {
                name,
                quantity,
                price,
            }),
            _ => Err(ImportError::MissingColumns(missing)),
        }
    }
}

/// Parses and validates one data row. `line` is 1-based, header included.
pub(crate) fn parse_row(
    record: &StringRecord,
    columns: &ColumnIndex,
    line: u64,
) -> Result<NewItem, ImportError> {
    let invalid = |message: String| ImportError::InvalidRow { line, message };
    let field = |index: usize, column: &str| {
        record
            .get(index)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| invalid(format!("missing value for `{column}`")))
    };

    let name = field(columns.name, "Name")?;
    let quantity_text = field(columns.quantity, "Quantity")?;
    let price_text = field(columns.price, "Price")?;

    let quantity = parse_quantity(quantity_text)
        .ok_or_else(|| invalid(format!("`Quantity` is not a whole number: `{quantity_text}`")))?;
    let price = price_text
        .parse::<f64>()
        .map_err(|_| invalid(format!("`Price` is not a number: `{price_text}`")))?;

    let item = NewItem::new(name, quantity, price);
    item.validate().map_err(|err| invalid(err.to_string()))?;
    Ok(item)
}

/// Accepts `12` as well as spreadsheet-style `12.0`.
fn parse_quantity(value: &str) -> Option<i64> {
    if let Ok(quantity) = value.parse::<i64>() {
        return Some(quantity);
    }
    let float = value.parse::<f64>().ok()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    if float.is_finite() && float.fract() == 0.0 && in_range {
        Some(float as i64)
    } else {
        None
    }
}
