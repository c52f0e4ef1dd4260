//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The raw grouped counts a pivot is computed from.
//!
//! Every map here is insertion ordered. The order rows appear in the source
//! is the order they appear in the table, so a plain `HashMap` would make the
//! output nondeterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identifies one column of a pivot (a status value or a picklist value).
pub type CategoryKey = String;

/// Identifies one row of a pivot (a user name or id).
pub type RowKey = String;

/// Counts for a single row, keyed by category, in source order.
///
/// Counts are signed so that a negative value coming from a buggy producer
/// can be detected and rejected instead of silently wrapping.
pub type CategoryCounts = IndexMap<CategoryKey, i64>;

/// Row key -> category -> count, in first-seen row order.
pub type RawGroupedCounts = IndexMap<RowKey, CategoryCounts>;

// ============================================================================
// AGGREGATION MODE
// ============================================================================

/// How the aggregator treats row entries whose category is not a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateMode {
    /// Entries outside the column set are ignored.
    Lenient,
    /// Entries outside the column set are a `ValidationError`.
    Strict,
}

impl Default for AggregateMode {
    fn default() -> Self {
        AggregateMode::Lenient
    }
}

impl AggregateMode {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            AggregateMode::Strict
        } else {
            AggregateMode::Lenient
        }
    }
}

// ============================================================================
// BUILDERS
// ============================================================================

/// Builds a `RawGroupedCounts` from borrowed tuples, keeping tuple order.
///
/// Repeated row keys are merged into the first occurrence; a repeated
/// category within a row keeps the last count.
pub fn grouped_counts<'a, R, C>(rows: R) -> RawGroupedCounts
where
    R: IntoIterator<Item = (&'a str, C)>,
    C: IntoIterator<Item = (&'a str, i64)>,
{
    let mut raw = RawGroupedCounts::new();
    for (row, counts) in rows {
        let entry = raw.entry(row.to_string()).or_default();
        for (category, count) in counts {
            entry.insert(category.to_string(), count);
        }
    }
    raw
}

/// Owned column list from borrowed names.
pub fn category_keys<'a, I>(names: I) -> Vec<CategoryKey>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().map(str::to_string).collect()
}
