//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - Immutable output for the presentation layer.
//!
//! A `PivotTable` is a plain value: it is computed fresh from one snapshot
//! of grouped counts, never mutated afterwards, and replaced wholesale when
//! the next snapshot arrives. All types serialize to camelCase JSON.

use serde::{Deserialize, Serialize};
use crate::definition::{CategoryKey, RowKey};

// ============================================================================
// CELLS AND ROWS
// ============================================================================

/// One count in a row or in the totals row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotCell {
    pub category: CategoryKey,
    pub count: u64,
}

impl PivotCell {
    pub fn new(category: impl Into<CategoryKey>, count: u64) -> Self {
        PivotCell {
            category: category.into(),
            count,
        }
    }
}

/// A single row of the cross-tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotRow {
    pub row: RowKey,

    /// One cell per column, in column order. Absent counts are zero-filled.
    pub cells: Vec<PivotCell>,

    /// Sum of `cells[*].count`.
    pub row_total: u64,
}

impl PivotRow {
    /// Count for a category, or `None` if it is not a column.
    pub fn count(&self, category: &str) -> Option<u64> {
        self.cells
            .iter()
            .find(|cell| cell.category == category)
            .map(|cell| cell.count)
    }

    /// Counts in column order.
    pub fn counts(&self) -> Vec<u64> {
        self.cells.iter().map(|cell| cell.count).collect()
    }
}

// ============================================================================
// PIVOT TABLE
// ============================================================================

/// A user-by-category cross-tab with all margins filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotTable {
    /// Column order as supplied by the source. Never re-sorted.
    pub columns: Vec<CategoryKey>,

    /// Rows in first-seen order of their key in the raw input.
    pub rows: Vec<PivotRow>,

    /// Per-column totals, aligned to `columns`.
    pub totals_row: Vec<PivotCell>,

    pub grand_total: u64,
}

impl PivotTable {
    /// A table with the given columns, no rows and zeroed totals.
    pub fn empty(columns: Vec<CategoryKey>) -> Self {
        let totals_row = columns
            .iter()
            .map(|column| PivotCell::new(column.clone(), 0))
            .collect();

        PivotTable {
            columns,
            rows: Vec::new(),
            totals_row,
            grand_total: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, key: &str) -> Option<&PivotRow> {
        self.rows.iter().find(|row| row.row == key)
    }

    pub fn row_keys(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.row.as_str()).collect()
    }

    /// Totals-row count for a category, or `None` if it is not a column.
    pub fn column_total(&self, category: &str) -> Option<u64> {
        self.totals_row
            .iter()
            .find(|cell| cell.category == category)
            .map(|cell| cell.count)
    }

    /// Totals row in column order.
    pub fn column_totals(&self) -> Vec<u64> {
        self.totals_row.iter().map(|cell| cell.count).collect()
    }

    /// Re-derives every margin from the cells and compares it to the stored
    /// one. Also checks that each row is aligned to `columns`.
    pub fn margins_consistent(&self) -> bool {
        if self.totals_row.len() != self.columns.len() {
            return false;
        }

        let mut column_sums = vec![0u128; self.columns.len()];
        let mut row_total_sum: u128 = 0;

        for row in &self.rows {
            if row.cells.len() != self.columns.len() {
                return false;
            }
            let mut sum: u128 = 0;
            for (i, (cell, column)) in row.cells.iter().zip(&self.columns).enumerate() {
                if &cell.category != column {
                    return false;
                }
                sum += u128::from(cell.count);
                column_sums[i] += u128::from(cell.count);
            }
            if sum != u128::from(row.row_total) {
                return false;
            }
            row_total_sum += sum;
        }

        let aligned_totals = self
            .totals_row
            .iter()
            .zip(&self.columns)
            .zip(&column_sums)
            .all(|((cell, column), sum)| &cell.category == column && u128::from(cell.count) == *sum);

        let totals_sum: u128 = self.totals_row.iter().map(|cell| u128::from(cell.count)).sum();

        aligned_totals
            && row_total_sum == u128::from(self.grand_total)
            && totals_sum == u128::from(self.grand_total)
    }
}

// ============================================================================
// MULTI-FIELD SET
// ============================================================================

/// One cross-tab for a configured categorical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPivot {
    /// Field API name as the source reported it (e.g. `Lead_Source__c`).
    pub field_id: String,

    /// Display name derived from `field_id`.
    pub field_label: String,

    pub table: PivotTable,
}

/// Ordered set of per-field cross-tabs, in the order the source returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiFieldPivotSet {
    pub tables: Vec<FieldPivot>,
}

impl MultiFieldPivotSet {
    pub fn has_tables(&self) -> bool {
        !self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldPivot> {
        self.tables.iter().find(|pivot| pivot.field_id == field_id)
    }

    pub fn field_ids(&self) -> Vec<&str> {
        self.tables.iter().map(|pivot| pivot.field_id.as_str()).collect()
    }
}
