//! CSV export of the full listing.

use crate::model::item::InventoryItem;
use crate::repo::item_repo::RepoError;
use csv::WriterBuilder;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

/// Header row of every export file.
pub const EXPORT_HEADER: [&str; 4] = ["id", "name", "quantity", "price"];

#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
    Xlsx(rust_xlsxwriter::XlsxError),
    /// The listing does not fit on one worksheet.
    TooManyRows(usize),
    Repo(RepoError),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "failed to write CSV: {err}"),
            Self::Io(err) => write!(f, "failed to write export: {err}"),
            Self::Xlsx(err) => write!(f, "failed to write workbook: {err}"),
            Self::TooManyRows(count) => write!(f, "{count} items do not fit on one worksheet"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Xlsx(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::TooManyRows(_) => None,
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        Self::Xlsx(value)
    }
}

impl From<RepoError> for ExportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Writes the header and one record per item, in the given order.
pub fn write_csv<W: Write>(items: &[InventoryItem], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(EXPORT_HEADER)?;
    for item in items {
        csv_writer.serialize(item)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Serializes items to an in-memory UTF-8 CSV document.
pub fn to_csv_bytes(items: &[InventoryItem]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_csv(items, &mut buffer)?;
    Ok(buffer)
}
