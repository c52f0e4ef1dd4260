//! FILENAME: core/pivot-engine/src/lib.rs
//! Record-count pivot subsystem.
//!
//! This crate turns raw grouped counts (row key -> category -> count) into
//! cross-tab tables with row totals, a totals row and a grand total. It has
//! no knowledge of where the counts come from or how the tables are shown.
//!
//! Layers:
//! - `definition`: Raw input shapes (what the pivot is computed FROM)
//! - `view`: Immutable output tables (WHAT we display)
//! - `engine`: Aggregation (HOW we calculate)
//! - `error`: Contract violations in the input

pub mod definition;
pub mod view;
pub mod engine;
pub mod error;

pub use definition::*;
pub use view::*;
pub use engine::{aggregate, PivotAggregator};
pub use error::ValidationError;
