//! Chart reports over the inventory listing.
//!
//! # Responsibility
//! - Render quantity, distribution and value charts as standalone SVG.
//! - Apply the light or dark chart theme.
//!
//! # Invariants
//! - Charts are drawn in listing order; bar `i` is item `i`.
//! - Rendering never touches storage; callers pass the listing in.

mod charts;

pub use charts::{render_report, ChartTheme, Report, ReportError, ReportResult, CHART_SIZE};
