//! Inventory table definition and idempotent bootstrap.
//!
//! # Invariants
//! - `id` is `AUTOINCREMENT`, so deleted ids are never handed out again.
//! - `name` carries the store-level `UNIQUE` constraint.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Columns the repository binds by name.
pub const INVENTORY_COLUMNS: &[&str] = &["id", "name", "quantity", "price"];

/// Creates the `inventory` table when absent and checks an existing one.
///
/// Safe to call on every start. Tables created by earlier versions of the
/// application are accepted as long as they carry all required columns.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('inventory');")?;
    let existing = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for column in INVENTORY_COLUMNS.iter().copied() {
        if !existing.iter().any(|name| name == column) {
            return Err(DbError::IncompatibleSchema {
                missing_column: column,
            });
        }
    }

    Ok(())
}
