//! Inventory use-case service.
//!
//! # Responsibility
//! - Provide the entry points the CLI calls for every dashboard action.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Names are trimmed before they reach the store.
//! - Service layer remains storage-agnostic.

use crate::model::item::{InventoryItem, ItemId, NewItem};
use crate::repo::item_repo::{InsertOutcome, ItemRepository, RepoResult};
use crate::service::metrics::InventoryMetrics;
use crate::transfer::{
    parse_csv_import, parse_xlsx_import, to_xlsx_bytes, write_csv, ExportError, ImportError,
    ImportSummary,
};
use log::info;
use std::io::{Read, Seek, Write};

/// Use-case service wrapper for inventory operations.
pub struct InventoryService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> InventoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a new item.
    ///
    /// # Contract
    /// - Returns `InsertOutcome::Duplicate` when the trimmed name exists.
    /// - Validation failures are errors; duplicates are not.
    pub fn add_item(
        &self,
        name: impl AsRef<str>,
        quantity: i64,
        price: f64,
    ) -> RepoResult<InsertOutcome> {
        let item = NewItem::new(name.as_ref().trim(), quantity, price);
        self.repo.insert_item(&item)
    }

    /// Replaces quantity and price. Returns whether a row matched `id`.
    pub fn update_item(&self, id: ItemId, quantity: i64, price: f64) -> RepoResult<bool> {
        Ok(self.repo.update_item(id, quantity, price)? > 0)
    }

    /// Adds `delta` units in one atomic statement. Returns whether `id` matched.
    pub fn restock_item(&self, id: ItemId, delta: i64) -> RepoResult<bool> {
        Ok(self.repo.increment_quantity(id, delta)? > 0)
    }

    /// Hard-deletes an item. Returns whether a row was removed.
    pub fn delete_item(&self, id: ItemId) -> RepoResult<bool> {
        Ok(self.repo.delete_item(id)? > 0)
    }

    pub fn get_item(&self, id: ItemId) -> RepoResult<Option<InventoryItem>> {
        self.repo.get_item(id)
    }

    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<InventoryItem>> {
        self.repo.find_by_name(name.trim())
    }

    pub fn list_items(&self) -> RepoResult<Vec<InventoryItem>> {
        self.repo.list_items()
    }

    /// Case-insensitive substring search on item names.
    ///
    /// Blank `text` returns the full listing.
    pub fn search_items(&self, text: &str) -> RepoResult<Vec<InventoryItem>> {
        let needle = text.trim().to_lowercase();
        let items = self.repo.list_items()?;
        if needle.is_empty() {
            return Ok(items);
        }
        Ok(items
            .into_iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect())
    }

    pub fn low_stock_items(&self, threshold: i64) -> RepoResult<Vec<InventoryItem>> {
        self.repo.low_stock_items(threshold)
    }

    /// Totals over the current listing.
    pub fn metrics(&self, threshold: i64) -> RepoResult<InventoryMetrics> {
        let items = self.repo.list_items()?;
        Ok(InventoryMetrics::from_items(&items, threshold))
    }

    /// Imports a CSV file with `Name`, `Quantity` and `Price` columns.
    ///
    /// # Contract
    /// - The whole file is parsed and validated before the first insert.
    /// - Each row is inserted independently; duplicate names are tallied.
    /// - A storage error stops the import without undoing earlier rows.
    pub fn import_csv<Input: Read>(&self, reader: Input) -> Result<ImportSummary, ImportError> {
        let rows = parse_csv_import(reader)?;
        self.insert_rows(rows, "csv")
    }

    /// Imports the first worksheet of an `.xlsx` workbook.
    ///
    /// Same contract as [`Self::import_csv`].
    pub fn import_xlsx<Input: Read + Seek>(
        &self,
        reader: Input,
    ) -> Result<ImportSummary, ImportError> {
        let rows = parse_xlsx_import(reader)?;
        self.insert_rows(rows, "xlsx")
    }

    /// Writes the full listing as CSV. Returns the number of items written.
    pub fn export_csv<Output: Write>(&self, writer: Output) -> Result<usize, ExportError> {
        let items = self.repo.list_items()?;
        write_csv(&items, writer)?;
        info!(
            "event=export module=service status=ok format=csv items={}",
            items.len()
        );
        Ok(items.len())
    }

    /// Writes the full listing as a one-sheet `.xlsx` workbook.
    pub fn export_xlsx<Output: Write>(&self, mut writer: Output) -> Result<usize, ExportError> {
        let items = self.repo.list_items()?;
        writer.write_all(&to_xlsx_bytes(&items)?)?;
        writer.flush()?;
        info!(
            "event=export module=service status=ok format=xlsx items={}",
            items.len()
        );
        Ok(items.len())
    }

    fn insert_rows(&self, rows: Vec<NewItem>, format: &str) -> Result<ImportSummary, ImportError> {
        let mut summary = ImportSummary {
            rows: rows.len(),
            ..ImportSummary::default()
        };

        for row in rows {
            match self.repo.insert_item(&row)? {
                InsertOutcome::Inserted(_) => summary.added += 1,
                InsertOutcome::Duplicate => summary.duplicates.push(row.name),
            }
        }

        info!(
            "event=import module=service status=ok format={format} rows={} added={} duplicates={}",
            summary.rows,
            summary.added,
            summary.duplicates.len()
        );
        Ok(summary)
    }
}
