//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and low-stock queries over the `inventory` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - All values are bound as parameters; no value is formatted into SQL.
//! - Listings are ordered by `id` ascending (insertion order).
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::item::{
    validate_stock, InventoryItem, ItemId, ItemValidationError, NewItem,
};
use log::{debug, warn};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ITEM_SELECT_SQL: &str = "SELECT id, name, quantity, price FROM inventory";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of an insert attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Row created with a freshly assigned id.
    Inserted(ItemId),
    /// Another row already carries this name; nothing was written.
    Duplicate,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }

    pub fn id(&self) -> Option<ItemId> {
        match self {
            Self::Inserted(id) => Some(*id),
            Self::Duplicate => None,
        }
    }
}

/// Repository interface for inventory items.
pub trait ItemRepository {
    fn insert_item(&self, item: &NewItem) -> RepoResult<InsertOutcome>;
    /// Sets quantity and price; returns the number of rows changed (0 or 1).
    fn update_item(&self, id: ItemId, quantity: i64, price: f64) -> RepoResult<usize>;
    /// Atomically adds `delta` to quantity; returns rows changed (0 or 1).
    ///
    /// Fails with `QuantityOverflow` and writes nothing when the sum would
    /// not fit in an `i64`.
    fn increment_quantity(&self, id: ItemId, delta: i64) -> RepoResult<usize>;
    /// Hard-deletes one row; returns rows removed (0 or 1).
    fn delete_item(&self, id: ItemId) -> RepoResult<usize>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<InventoryItem>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<InventoryItem>>;
    fn list_items(&self) -> RepoResult<Vec<InventoryItem>>;
    /// Items with `quantity < threshold`, in listing order.
    fn low_stock_items(&self, threshold: i64) -> RepoResult<Vec<InventoryItem>>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_items(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<InventoryItem>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn query_one(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Option<InventoryItem>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_item_row(row)?)),
            None => Ok(None),
        }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn insert_item(&self, item: &NewItem) -> RepoResult<InsertOutcome> {
        item.validate()?;

        let result = self.conn.execute(
            "INSERT INTO inventory (name, quantity, price) VALUES (?1, ?2, ?3);",
            params![item.name.as_str(), item.quantity, item.price],
        );

        match result {
            Ok(_) => {
                let id = ItemId(self.conn.last_insert_rowid());
                debug!("event=item_insert module=repo status=ok item_id={id}");
                Ok(InsertOutcome::Inserted(id))
            }
            Err(err) if is_unique_violation(&err) => {
                warn!("event=item_insert module=repo status=duplicate");
                Ok(InsertOutcome::Duplicate)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_item(&self, id: ItemId, quantity: i64, price: f64) -> RepoResult<usize> {
        validate_stock(quantity, price)?;

        let changed = self.conn.execute(
            "UPDATE inventory SET quantity = ?1, price = ?2 WHERE id = ?3;",
            params![quantity, price, id.0],
        )?;
        debug!("event=item_update module=repo item_id={id} changed={changed}");
        Ok(changed)
    }

    fn increment_quantity(&self, id: ItemId, delta: i64) -> RepoResult<usize> {
        if delta < 0 {
            return Err(ItemValidationError::NegativeRestock(delta).into());
        }

        // SQLite turns an overflowing integer sum into REAL, so cap the
        // current quantity in the statement itself.
        let changed = self.conn.execute(
            "UPDATE inventory SET quantity = quantity + ?1 WHERE id = ?2 AND quantity <= ?3;",
            params![delta, id.0, i64::MAX - delta],
        )?;
        if changed == 0 {
            if let Some(item) = self.get_item(id)? {
                warn!("event=item_restock module=repo status=overflow item_id={id} delta={delta}");
                return Err(ItemValidationError::QuantityOverflow {
                    quantity: item.quantity,
                    delta,
                }
                .into());
            }
        }
        debug!("event=item_restock module=repo item_id={id} delta={delta} changed={changed}");
        Ok(changed)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM inventory WHERE id = ?1;", [id.0])?;
        debug!("event=item_delete module=repo item_id={id} changed={changed}");
        Ok(changed)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<InventoryItem>> {
        self.query_one(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"), [id.0])
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<InventoryItem>> {
        self.query_one(&format!("{ITEM_SELECT_SQL} WHERE name = ?1;"), [name])
    }

    fn list_items(&self) -> RepoResult<Vec<InventoryItem>> {
        self.query_items(&format!("{ITEM_SELECT_SQL} ORDER BY id ASC;"), [])
    }

    fn low_stock_items(&self, threshold: i64) -> RepoResult<Vec<InventoryItem>> {
        self.query_items(
            &format!("{ITEM_SELECT_SQL} WHERE quantity < ?1 ORDER BY id ASC;"),
            [threshold],
        )
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<InventoryItem> {
    let id = ItemId(row.get("id")?);

    let name = row.get::<_, Option<String>>("name")?.ok_or_else(|| {
        RepoError::InvalidData(format!("null name for item {id} in inventory.name"))
    })?;
    let quantity = row.get::<_, Option<i64>>("quantity")?.ok_or_else(|| {
        RepoError::InvalidData(format!("null quantity for item {id} in inventory.quantity"))
    })?;
    let price = row.get::<_, Option<f64>>("price")?.ok_or_else(|| {
        RepoError::InvalidData(format!("null price for item {id} in inventory.price"))
    })?;

    let item = InventoryItem {
        id,
        name,
        quantity,
        price,
    };
    item.validate().map_err(|err| {
        RepoError::InvalidData(format!("item {id} failed validation: {err}"))
    })?;
    Ok(item)
}
