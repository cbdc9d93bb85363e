//! Core inventory logic for Stockroom.
//! This crate is the single source of truth for stock invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;
pub mod transfer;

pub use config::{ConfigError, ConfigOverrides, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{
    InventoryItem, ItemId, ItemValidationError, NewItem, DEFAULT_LOW_STOCK_THRESHOLD,
};
pub use repo::item_repo::{
    InsertOutcome, ItemRepository, RepoError, RepoResult, SqliteItemRepository,
};
pub use report::{render_report, ChartTheme, Report, ReportError};
pub use service::inventory_service::InventoryService;
pub use service::metrics::InventoryMetrics;
pub use transfer::{ExportError, ImportError, ImportSummary};
