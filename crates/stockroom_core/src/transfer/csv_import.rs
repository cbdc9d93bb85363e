//! CSV import parsing.
//!
//! Parsing and validation of every row happens before the service inserts
//! anything, so malformed files never leave a partial import behind.

use super::import::{parse_row, ColumnIndex, ImportError};
use crate::model::item::NewItem;
use csv::ReaderBuilder;
use std::io::Read;

/// Reads a CSV import file into validated insert requests.
///
/// # Errors
/// - `MissingColumns` when the header lacks a required column.
/// - `InvalidRow` for the first row with a bad value.
/// - `Csv` when the input is not readable CSV.
pub fn parse_csv_import<R: Read>(reader: R) -> Result<Vec<NewItem>, ImportError> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = ColumnIndex::resolve(csv_reader.headers()?)?;

    let mut items = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = record
            .position()
            .map_or(index as u64 + 2, |position| position.line());
        items.push(parse_row(&record, &columns, line)?);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::parse_csv_import;
    use crate::transfer::ImportError;

    #[test]
    fn reads_columns_in_any_order_and_ignores_extras() {
        let input = "Price,Notes,Name,Quantity\n2.5,spare,Bolt,10\n";
        let items = parse_csv_import(input.as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Bolt");
        assert_eq!(items[0].quantity, 10);
        assert_eq!(items[0].price, 2.5);
    }

    #[test]
    fn matches_headers_case_sensitively() {
        let input = "name,Quantity,PRICE\nBolt,1,1.0\n";
        let err = parse_csv_import(input.as_bytes()).unwrap_err();
        match err {
            ImportError::MissingColumns(missing) => assert_eq!(missing, vec!["Name", "Price"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reports_line_of_bad_value() {
        let input = "Name,Quantity,Price\nBolt,1,1.0\nNut,lots,1.0\n";
        let err = parse_csv_import(input.as_bytes()).unwrap_err();
        match err {
            ImportError::InvalidRow { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("Quantity"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_short_rows_and_negative_values() {
        let short = "Name,Quantity,Price\nBolt,1\n";
        assert!(matches!(
            parse_csv_import(short.as_bytes()),
            Err(ImportError::InvalidRow { line: 2, .. })
        ));

        let negative = "Name,Quantity,Price\nBolt,-1,1.0\n";
        assert!(matches!(
            parse_csv_import(negative.as_bytes()),
            Err(ImportError::InvalidRow { line: 2, .. })
        ));
    }
}
