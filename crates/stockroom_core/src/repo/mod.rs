//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate inputs before any SQL mutation.
//! - Duplicate names surface as `InsertOutcome::Duplicate`, never as errors.
//! - Mutations report affected-row counts instead of `NotFound` errors.

pub mod item_repo;
