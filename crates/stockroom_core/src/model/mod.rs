//! Inventory domain model.
//!
//! # Responsibility
//! - Define the stock item record shared by repository, service and CLI.
//! - Own the range checks applied at every write boundary.
//!
//! # Invariants
//! - Every persisted item is identified by a store-assigned `ItemId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod item;
