//! Handlers for each CLI subcommand.
//!
//! # Responsibility
//! - Translate one user action into one inventory use case.
//! - Report success or failure as an inline message on `out`.

use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use stockroom_core::transfer::{to_xlsx_bytes, write_csv};
use stockroom_core::{
    render_report, ChartTheme, InsertOutcome, InventoryItem, InventoryService, ItemId,
    ItemRepository, ReportError,
};

use crate::output::{item_table, metrics_lines};

/// Tabular file format for import and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// An explicit choice wins; otherwise `.xlsx` files are XLSX and everything else CSV.
    pub fn resolve(explicit: Option<Self>, path: Option<&Path>) -> Self {
        if let Some(format) = explicit {
            return format;
        }
        let is_xlsx = path
            .and_then(Path::extension)
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("xlsx"));
        if is_xlsx {
            Self::Xlsx
        } else {
            Self::Csv
        }
    }
}

pub fn list<R: ItemRepository>(
    service: &InventoryService<R>,
    search: Option<&str>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let items = match search {
        Some(text) => service.search_items(text)?,
        None => service.list_items()?,
    };
    if json {
        return write_json(&items, out);
    }
    if items.is_empty() {
        writeln!(out, "No items in inventory.")?;
    } else {
        writeln!(out, "{}", item_table(&items))?;
    }
    Ok(())
}

pub fn summary<R: ItemRepository>(
    service: &InventoryService<R>,
    threshold: i64,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let metrics = service.metrics(threshold)?;
    if json {
        return write_json(&metrics, out);
    }
    for line in metrics_lines(&metrics) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

pub fn low_stock<R: ItemRepository>(
    service: &InventoryService<R>,
    threshold: i64,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let items = service.low_stock_items(threshold)?;
    if json {
        return write_json(&items, out);
    }
    if items.is_empty() {
        writeln!(out, "No items below {threshold} units.")?;
    } else {
        writeln!(out, "{}", item_table(&items))?;
    }
    Ok(())
}

pub fn add<R: ItemRepository>(
    service: &InventoryService<R>,
    name: &str,
    quantity: i64,
    price: f64,
    out: &mut impl Write,
) -> Result<()> {
    let name = name.trim();
    match service.add_item(name, quantity, price)? {
        InsertOutcome::Inserted(id) => {
            writeln!(out, "Item '{name}' added successfully! (id {id})")?;
        }
        InsertOutcome::Duplicate => writeln!(out, "Item '{name}' already exists!")?,
    }
    Ok(())
}

pub fn update<R: ItemRepository>(
    service: &InventoryService<R>,
    id: ItemId,
    quantity: i64,
    price: f64,
    out: &mut impl Write,
) -> Result<()> {
    let Some(item) = lookup(service, id, out)? else {
        return Ok(());
    };
    if service.update_item(id, quantity, price)? {
        writeln!(out, "Item '{}' updated successfully!", item.name)?;
    } else {
        write_missing(id, out)?;
    }
    Ok(())
}

pub fn restock<R: ItemRepository>(
    service: &InventoryService<R>,
    id: ItemId,
    amount: i64,
    out: &mut impl Write,
) -> Result<()> {
    let Some(item) = lookup(service, id, out)? else {
        return Ok(());
    };
    if service.restock_item(id, amount)? {
        writeln!(out, "Item '{}' restocked by {amount} units.", item.name)?;
    } else {
        write_missing(id, out)?;
    }
    Ok(())
}

pub fn delete<R: ItemRepository>(
    service: &InventoryService<R>,
    id: ItemId,
    out: &mut impl Write,
) -> Result<()> {
    let Some(item) = lookup(service, id, out)? else {
        return Ok(());
    };
    if service.delete_item(id)? {
        writeln!(out, "Item '{}' deleted successfully!", item.name)?;
    } else {
        write_missing(id, out)?;
    }
    Ok(())
}

pub fn report<R: ItemRepository>(
    service: &InventoryService<R>,
    out_dir: &Path,
    theme: ChartTheme,
    out: &mut impl Write,
) -> Result<()> {
    let items = service.list_items()?;
    let report = match render_report(&items, theme) {
        Ok(report) => report,
        Err(ReportError::NoData) => {
            writeln!(out, "No data to display in reports.")?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create report directory `{}`", out_dir.display()))?;
    for (file_name, svg) in report.files() {
        let path = out_dir.join(file_name);
        std::fs::write(&path, svg)
            .with_context(|| format!("cannot write chart `{}`", path.display()))?;
        writeln!(out, "Wrote {}", path.display())?;
    }
    info!(
        "event=report_write module=cli status=ok charts={} items={}",
        report.files().len(),
        items.len()
    );
    Ok(())
}

pub fn import<R: ItemRepository>(
    service: &InventoryService<R>,
    file: &Path,
    format: FileFormat,
    out: &mut impl Write,
) -> Result<()> {
    let reader = File::open(file)
        .map(BufReader::new)
        .with_context(|| format!("cannot open import file `{}`", file.display()))?;
    let summary = match format {
        FileFormat::Csv => service.import_csv(reader),
        FileFormat::Xlsx => service.import_xlsx(reader),
    }
    .with_context(|| format!("error reading file `{}`", file.display()))?;

    writeln!(out, "Imported {} new items successfully!", summary.added)?;
    if !summary.duplicates.is_empty() {
        writeln!(
            out,
            "Skipped {} existing item(s): {}",
            summary.duplicates.len(),
            summary.duplicates.join(", ")
        )?;
    }
    Ok(())
}

pub fn export<R: ItemRepository>(
    service: &InventoryService<R>,
    output: Option<&Path>,
    format: FileFormat,
    out: &mut impl Write,
) -> Result<()> {
    let items = service.list_items()?;
    if items.is_empty() {
        writeln!(out, "No inventory data to export.")?;
        return Ok(());
    }

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create export file `{}`", path.display()))?;
            write_export(&items, format, BufWriter::new(file))?;
            writeln!(out, "Exported {} items to {}", items.len(), path.display())?;
        }
        None => write_export(&items, format, &mut *out)?,
    }
    info!(
        "event=export module=cli status=ok format={format:?} items={}",
        items.len()
    );
    Ok(())
}

fn write_export(
    items: &[InventoryItem],
    format: FileFormat,
    mut writer: impl Write,
) -> Result<()> {
    match format {
        FileFormat::Csv => write_csv(items, writer)?,
        FileFormat::Xlsx => {
            writer.write_all(&to_xlsx_bytes(items)?)?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn lookup<R: ItemRepository>(
    service: &InventoryService<R>,
    id: ItemId,
    out: &mut impl Write,
) -> Result<Option<InventoryItem>> {
    let item = service.get_item(id)?;
    if item.is_none() {
        write_missing(id, out)?;
    }
    Ok(item)
}

fn write_missing(id: ItemId, out: &mut impl Write) -> Result<()> {
    writeln!(out, "No item with id {id}.")?;
    Ok(())
}

fn write_json<T: serde::Serialize + ?Sized>(value: &T, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        add, delete, export, import, list, low_stock, report, restock, summary, update, FileFormat,
    };
    use std::path::Path;
    use stockroom_core::db::open_db_in_memory;
    use stockroom_core::{ChartTheme, InventoryService, ItemId, SqliteItemRepository};

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_reports_success_then_duplicate() {
        let conn = open_db_in_memory().unwrap();
        let service = InventoryService::new(SqliteItemRepository::new(&conn));

        let mut out = Vec::new();
        add(&service, "Widget", 3, 1.0, &mut out).unwrap();
        add(&service, "Widget", 3, 1.0, &mut out).unwrap();

        let output = text(out);
        assert!(output.contains("Item 'Widget' added successfully!"));
        assert!(output.contains("Item 'Widget' already exists!"));
    }

    #[test]
    fn update_restock_delete_echo_item_name() {
        let conn = open_db_in_memory().unwrap();
        let service = InventoryService::new(SqliteItemRepository::new(&conn));
        let id = service.add_item("Gear", 2, 1.0).unwrap().id().unwrap();

        let mut out = Vec::new();
        update(&service, id, 4, 2.0, &mut out).unwrap();
        restock(&service, id, 6, &mut out).unwrap();
        assert_eq!(service.get_item(id).unwrap().unwrap().quantity, 10);
        delete(&service, id, &mut out).unwrap();
        delete(&service, id, &mut out).unwrap();

        let output = text(out);
        assert!(output.contains("Item 'Gear' updated successfully!"));
        assert!(output.contains("Item 'Gear' restocked by 6 units."));
        assert!(output.contains("Item 'Gear' deleted successfully!"));
        assert!(output.contains(&format!("No item with id {id}.")));
    }

    #[test]
    fn list_and_low_stock_handle_empty_store() {
        let conn = open_db_in_memory().unwrap();
        let service = InventoryService::new(SqliteItemRepository::new(&conn));

        let mut out = Vec::new();
        list(&service, None, false, &mut out).unwrap();
        low_stock(&service, 5, false, &mut out).unwrap();
        summary(&service, 5, false, &mut out).unwrap();

        let output = text(out);
        assert!(output.contains("No items in inventory."));
        assert!(output.contains("No items below 5 units."));
        assert!(output.contains("Total Stock Units:     0"));
    }

    #[test]
    fn list_json_filters_by_search_text() {
        let conn = open_db_in_memory().unwrap();
        let service = InventoryService::new(SqliteItemRepository::new(&conn));
        service.add_item("Hex Bolt", 10, 0.2).unwrap();
        service.add_item("Washer", 100, 0.01).unwrap();

        let mut out = Vec::new();
        list(&service, Some("bolt"), true, &mut out).unwrap();

        let rows: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["name"], "Hex Bolt");
    }

    #[test]
    fn import_and_export_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stock.csv");
        std::fs::write(&input, "Name,Quantity,Price\nA,5,1.0\nB,3,2.0\nA,1,1.0\n").unwrap();

        let conn = open_db_in_memory().unwrap();
        let service = InventoryService::new(SqliteItemRepository::new(&conn));

        let mut out = Vec::new();
        import(&service, &input, FileFormat::Csv, &mut out).unwrap();
        let exported = dir.path().join("export.csv");
        export(&service, Some(exported.as_path()), FileFormat::Csv, &mut out).unwrap();

        let output = text(out);
        assert!(output.contains("Imported 2 new items successfully!"));
        assert!(output.contains("Skipped 1 existing item(s): A"));
        assert_eq!(
            std::fs::read_to_string(&exported).unwrap(),
            "id,name,quantity,price\n1,A,5,1.0\n2,B,3,2.0\n"
        );
    }

    #[test]
    fn xlsx_export_writes_workbook_with_lowercase_headers() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_db_in_memory().unwrap();
        let service = InventoryService::new(SqliteItemRepository::new(&conn));
        service.add_item("Bolt", 10, 2.5).unwrap();

        let exported = dir.path().join("export.xlsx");
        let mut out = Vec::new();
        export(&service, Some(exported.as_path()), FileFormat::Xlsx, &mut out).unwrap();
        assert!(text(out).contains("Exported 1 items to"));
        // XLSX files are zip archives.
        assert!(std::fs::read(&exported).unwrap().starts_with(b"PK"));

        let mut out = Vec::new();
        let err = import(&service, &exported, FileFormat::Xlsx, &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("missing: Name, Quantity, Price"));
    }

    #[test]
    fn format_follows_flag_then_extension() {
        let xlsx = Path::new("stock.XLSX");
        let csv = Path::new("stock.csv");
        assert_eq!(FileFormat::resolve(None, Some(xlsx)), FileFormat::Xlsx);
        assert_eq!(FileFormat::resolve(None, Some(csv)), FileFormat::Csv);
        assert_eq!(FileFormat::resolve(None, None), FileFormat::Csv);
        assert_eq!(
            FileFormat::resolve(Some(FileFormat::Xlsx), Some(csv)),
            FileFormat::Xlsx
        );
    }

    #[test]
    fn export_on_empty_store_warns_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let exported = dir.path().join("export.csv");
        let conn = open_db_in_memory().unwrap();
        let service = InventoryService::new(SqliteItemRepository::new(&conn));

        let mut out = Vec::new();
        export(&service, Some(exported.as_path()), FileFormat::Csv, &mut out).unwrap();

        assert!(text(out).contains("No inventory data to export."));
        assert!(!exported.exists());
    }

    #[test]
    fn report_writes_three_charts() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_db_in_memory().unwrap();
        let service = InventoryService::new(SqliteItemRepository::new(&conn));

        let mut out = Vec::new();
        report(&service, dir.path(), ChartTheme::Dark, &mut out).unwrap();
        assert!(text(out).contains("No data to display in reports."));

        service.add_item("Bolt", 10, 2.5).unwrap();
        let mut out = Vec::new();
        report(&service, dir.path(), ChartTheme::Dark, &mut out).unwrap();
        for name in ["quantity_by_item.svg", "stock_distribution.svg", "value_by_item.svg"] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
    }

    #[test]
    fn missing_target_is_reported_not_an_error() {
        let conn = open_db_in_memory().unwrap();
        let service = InventoryService::new(SqliteItemRepository::new(&conn));

        let mut out = Vec::new();
        update(&service, ItemId(9), 1, 1.0, &mut out).unwrap();
        assert_eq!(text(out), "No item with id 9.\n");
    }
}
