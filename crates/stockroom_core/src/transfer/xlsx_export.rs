//! XLSX export of the full listing.

use super::csv_export::{ExportError, EXPORT_HEADER};
use crate::model::item::InventoryItem;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};

/// Name of the single worksheet in exported workbooks.
pub const EXPORT_SHEET_NAME: &str = "Inventory";

/// Builds a one-sheet workbook: bold header row, then one row per item.
pub fn to_xlsx_bytes(items: &[InventoryItem]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;
    for (col, title) in EXPORT_HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as ColNum, *title, &header_format)?;
    }

    for (index, item) in items.iter().enumerate() {
        let row = RowNum::try_from(index + 1)
            .map_err(|_| ExportError::TooManyRows(items.len()))?;
        sheet.write_number(row, 0, item.id.0 as f64)?;
        sheet.write_string(row, 1, item.name.as_str())?;
        sheet.write_number(row, 2, item.quantity as f64)?;
        sheet.write_number(row, 3, item.price)?;
    }

    Ok(workbook.save_to_buffer()?)
}
