//! Bulk import and export in CSV and XLSX.
//!
//! # Responsibility
//! - Translate between tabular files and inventory rows.
//! - Keep header and number parsing rules in one place for both formats.
//!
//! # Invariants
//! - Import headers are matched exactly (`Name`, `Quantity`, `Price`).
//! - Export always starts with the `id,name,quantity,price` header.

pub mod csv_export;
pub mod csv_import;
mod import;
pub mod xlsx_export;
pub mod xlsx_import;

pub use csv_export::{to_csv_bytes, write_csv, ExportError, EXPORT_HEADER};
pub use csv_import::parse_csv_import;
pub use import::{ImportError, ImportSummary, IMPORT_COLUMNS};
pub use xlsx_export::{to_xlsx_bytes, EXPORT_SHEET_NAME};
pub use xlsx_import::parse_xlsx_import;
