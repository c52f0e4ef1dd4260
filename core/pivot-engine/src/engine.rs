//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - Turns raw grouped counts into a `PivotTable`.
//!
//! Algorithm:
//! 1. Index the columns by key (rejecting duplicates)
//! 2. For each row, in source order, scatter its counts into a column-aligned
//!    buffer (missing categories stay zero)
//! 3. Accumulate the row total, the per-column totals and the grand total in
//!    the same pass
//! 4. Emit the totals row in column order
//!
//! Each raw entry is read exactly once, so the cost is
//! O(rows x columns + raw entries).

use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};

use crate::definition::{AggregateMode, CategoryCounts, CategoryKey, RawGroupedCounts};
use crate::error::ValidationError;
use crate::view::{PivotCell, PivotRow, PivotTable};

/// Column-aligned counts. Dashboards rarely have more than a couple of dozen
/// columns, so this usually stays on the stack.
type ColumnCounts = SmallVec<[u64; 16]>;

// ============================================================================
// PIVOT AGGREGATOR
// ============================================================================

/// Computes cross-tabs from grouped counts.
///
/// The aggregator holds no state besides its mode; it is cheap to copy and
/// every call returns a fresh table that does not borrow from its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PivotAggregator {
    mode: AggregateMode,
}

impl PivotAggregator {
    pub fn new(mode: AggregateMode) -> Self {
        PivotAggregator { mode }
    }

    /// Ignores row entries whose category is not a column.
    pub fn lenient() -> Self {
        Self::new(AggregateMode::Lenient)
    }

    /// Rejects row entries whose category is not a column.
    pub fn strict() -> Self {
        Self::new(AggregateMode::Strict)
    }

    pub fn mode(&self) -> AggregateMode {
        self.mode
    }

    /// Builds the cross-tab for `columns` (kept in the given order) over `raw`
    /// (rows kept in insertion order).
    ///
    /// Empty `columns` or empty `raw` are not errors: the result simply has
    /// empty cells or no rows, with zero totals.
    pub fn aggregate(
        &self,
        columns: &[CategoryKey],
        raw: &RawGroupedCounts,
    ) -> Result<PivotTable, ValidationError> {
        let column_index = index_columns(columns)?;

        let mut column_totals: ColumnCounts = smallvec![0; columns.len()];
        let mut grand_total: u64 = 0;
        let mut rows = Vec::with_capacity(raw.len());

        for (row_key, counts) in raw {
            let row_counts = self.scatter_row(row_key, counts, &column_index, columns.len())?;

            let mut row_total: u64 = 0;
            let mut cells = Vec::with_capacity(columns.len());

            for (i, (column, &count)) in columns.iter().zip(row_counts.iter()).enumerate() {
                row_total = checked_sum(row_total, count, row_key)?;
                column_totals[i] = checked_sum(column_totals[i], count, row_key)?;
                cells.push(PivotCell::new(column.clone(), count));
            }

            grand_total = checked_sum(grand_total, row_total, row_key)?;

            rows.push(PivotRow {
                row: row_key.clone(),
                cells,
                row_total,
            });
        }

        let totals_row = columns
            .iter()
            .zip(column_totals.iter())
            .map(|(column, &count)| PivotCell::new(column.clone(), count))
            .collect();

        Ok(PivotTable {
            columns: columns.to_vec(),
            rows,
            totals_row,
            grand_total,
        })
    }

    /// Places one row's counts at their column positions.
    fn scatter_row(
        &self,
        row_key: &str,
        counts: &CategoryCounts,
        column_index: &FxHashMap<&str, usize>,
        column_count: usize,
    ) -> Result<ColumnCounts, ValidationError> {
        let mut row_counts: ColumnCounts = smallvec![0; column_count];

        for (category, &count) in counts {
            let count = u64::try_from(count).map_err(|_| ValidationError::NegativeCount {
                row: row_key.to_string(),
                category: category.clone(),
                count,
            })?;

            match column_index.get(category.as_str()) {
                Some(&i) => row_counts[i] = count,
                None if self.mode == AggregateMode::Strict => {
                    return Err(ValidationError::UnknownColumn {
                        row: row_key.to_string(),
                        category: category.clone(),
                    });
                }
                None => {}
            }
        }

        Ok(row_counts)
    }
}

/// Lenient aggregation; the entry point most callers want.
pub fn aggregate(
    columns: &[CategoryKey],
    raw: &RawGroupedCounts,
) -> Result<PivotTable, ValidationError> {
    PivotAggregator::lenient().aggregate(columns, raw)
}

// ============================================================================
// HELPERS
// ============================================================================

fn index_columns(columns: &[CategoryKey]) -> Result<FxHashMap<&str, usize>, ValidationError> {
    let mut index = FxHashMap::default();
    index.reserve(columns.len());

    for (i, column) in columns.iter().enumerate() {
        if index.insert(column.as_str(), i).is_some() {
            return Err(ValidationError::DuplicateColumn(column.clone()));
        }
    }

    Ok(index)
}

fn checked_sum(acc: u64, count: u64, row_key: &str) -> Result<u64, ValidationError> {
    acc.checked_add(count)
        .ok_or_else(|| ValidationError::CountOverflow(row_key.to_string()))
}
