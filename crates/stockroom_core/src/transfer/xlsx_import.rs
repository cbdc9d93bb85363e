//! XLSX import parsing.
//!
//! Reads the first worksheet. Cells are rendered to text and go through the
//! same header and row rules as CSV input.

use super::import::{parse_row, ColumnIndex, ImportError, IMPORT_COLUMNS};
use crate::model::item::NewItem;
use calamine::{Data, Reader, Xlsx};
use csv::StringRecord;
use std::fmt::Display;
use std::io::{Read, Seek};

/// Reads an `.xlsx` workbook into validated insert requests.
///
/// Rows whose cells are all blank are skipped.
///
/// # Errors
/// - `Spreadsheet` when the workbook is unreadable or has no worksheet.
/// - `MissingColumns` / `InvalidRow` as for CSV input.
pub fn parse_xlsx_import<R: Read + Seek>(reader: R) -> Result<Vec<NewItem>, ImportError> {
    let mut workbook: Xlsx<R> = Xlsx::new(reader).map_err(spreadsheet_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::Spreadsheet("workbook has no worksheets".to_string()))?
        .map_err(spreadsheet_err)?;

    let first_row = range.start().map_or(0, |(row, _)| u64::from(row));
    let mut rows = range.rows();
    let header = match rows.next() {
        Some(cells) => to_record(cells),
        None => return Err(ImportError::MissingColumns(IMPORT_COLUMNS.to_vec())),
    };
    let columns = ColumnIndex::resolve(&header)?;

    let mut items = Vec::new();
    for (index, cells) in rows.enumerate() {
        let record = to_record(cells);
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        // Sheet rows are 1-based and the header takes the first one.
        let line = first_row + index as u64 + 2;
        items.push(parse_row(&record, &columns, line)?);
    }

    Ok(items)
}

fn to_record(cells: &[Data]) -> StringRecord {
    cells.iter().map(cell_text).collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => value.to_string(),
        other => other.to_string(),
    }
}

fn spreadsheet_err(err: impl Display) -> ImportError {
    ImportError::Spreadsheet(err.to_string())
}
