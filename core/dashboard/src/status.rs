//! FILENAME: core/dashboard/src/status.rs
//! Status pivot: status boxes plus the user-by-status cross-tab.
//!
//! The boxes come straight from the source's per-status totals; the table is
//! recomputed from the user-by-status counts. The two are sourced separately,
//! so the builder cross-checks them and logs any disagreement without failing.

use std::fmt;

use indexmap::IndexMap;
use pivot_engine::{CategoryKey, PivotAggregator, PivotTable, ValidationError};
use serde::{Deserialize, Serialize};

use crate::types::StatusDashboardData;
use crate::{log_enter, log_exit, log_warn};

// ============================================================================
// OUTPUT
// ============================================================================

/// One headline count per status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBox {
    pub status: CategoryKey,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDashboard {
    /// In the iteration order of the source's status totals.
    pub status_boxes: Vec<StatusBox>,

    pub table: PivotTable,

    /// Grand total as the source reported it.
    pub reported_grand_total: i64,
}

/// A disagreement between the source totals and the computed table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyIssue {
    /// A status box does not match its column total (0 if not a column).
    StatusTotalMismatch {
        status: CategoryKey,
        boxed: u64,
        tabulated: u64,
    },
    /// A column has counts but no status box.
    MissingStatusBox { status: CategoryKey, tabulated: u64 },
    GrandTotalMismatch { reported: i64, tabulated: u64 },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyIssue::StatusTotalMismatch { status, boxed, tabulated } => write!(
                f,
                "status '{}' box count {} != table total {}",
                status, boxed, tabulated
            ),
            ConsistencyIssue::MissingStatusBox { status, tabulated } => write!(
                f,
                "status '{}' has table total {} but no status box",
                status, tabulated
            ),
            ConsistencyIssue::GrandTotalMismatch { reported, tabulated } => write!(
                f,
                "reported grand total {} != table grand total {}",
                reported, tabulated
            ),
        }
    }
}

impl StatusDashboard {
    /// No boxes, no columns, no rows.
    pub fn empty() -> Self {
        StatusDashboard {
            status_boxes: Vec::new(),
            table: PivotTable::empty(Vec::new()),
            reported_grand_total: 0,
        }
    }

    pub fn status_box(&self, status: &str) -> Option<&StatusBox> {
        self.status_boxes.iter().find(|b| b.status == status)
    }

    pub fn consistency_issues(&self) -> Vec<ConsistencyIssue> {
        let mut issues = Vec::new();

        for status_box in &self.status_boxes {
            let tabulated = self.table.column_total(&status_box.status).unwrap_or(0);
            if tabulated != status_box.count {
                issues.push(ConsistencyIssue::StatusTotalMismatch {
                    status: status_box.status.clone(),
                    boxed: status_box.count,
                    tabulated,
                });
            }
        }

        for cell in &self.table.totals_row {
            if cell.count > 0 && self.status_box(&cell.category).is_none() {
                issues.push(ConsistencyIssue::MissingStatusBox {
                    status: cell.category.clone(),
                    tabulated: cell.count,
                });
            }
        }

        let tabulated = self.table.grand_total;
        if u64::try_from(self.reported_grand_total).ok() != Some(tabulated) {
            issues.push(ConsistencyIssue::GrandTotalMismatch {
                reported: self.reported_grand_total,
                tabulated,
            });
        }

        issues
    }

    pub fn is_consistent(&self) -> bool {
        self.consistency_issues().is_empty()
    }
}

impl Default for StatusDashboard {
    fn default() -> Self {
        Self::empty()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Adapts a status snapshot into a `StatusDashboard`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusPivotBuilder {
    aggregator: PivotAggregator,
}

impl StatusPivotBuilder {
    pub fn new(aggregator: PivotAggregator) -> Self {
        StatusPivotBuilder { aggregator }
    }

    pub fn build(&self, data: &StatusDashboardData) -> Result<StatusDashboard, ValidationError> {
        log_enter!(
            "STATUS",
            "build",
            "statuses={} users={}",
            data.statuses.len(),
            data.user_status_map.len()
        );

        let status_boxes = status_boxes(&data.status_totals)?;
        let table = self.aggregator.aggregate(&data.statuses, &data.user_status_map)?;

        let dashboard = StatusDashboard {
            status_boxes,
            table,
            reported_grand_total: data.grand_total,
        };

        for issue in dashboard.consistency_issues() {
            log_warn!("STATUS", "{}", issue);
        }

        log_exit!("STATUS", "build", "rows={} grand_total={}", dashboard.table.rows.len(), dashboard.table.grand_total);
        Ok(dashboard)
    }
}

/// Status boxes in the iteration order of `totals`.
pub fn status_boxes(totals: &IndexMap<CategoryKey, i64>) -> Result<Vec<StatusBox>, ValidationError> {
    totals
        .iter()
        .map(|(status, &count)| {
            let count = u64::try_from(count).map_err(|_| ValidationError::NegativeTotal {
                category: status.clone(),
                count,
            })?;
            Ok(StatusBox {
                status: status.clone(),
                count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivot_engine::{category_keys, grouped_counts, PivotCell};

    fn open_closed_data() -> StatusDashboardData {
        StatusDashboardData {
            status_totals: IndexMap::from([("Open".to_string(), 3), ("Closed".to_string(), 3)]),
            statuses: category_keys(["Open", "Closed"]),
            user_status_map: grouped_counts([
                ("alice", vec![("Open", 3), ("Closed", 1)]),
                ("bob", vec![("Open", 0), ("Closed", 2)]),
            ]),
            grand_total: 6,
        }
    }

    #[test]
    fn test_build_status_dashboard() {
        let dashboard = StatusPivotBuilder::default().build(&open_closed_data()).unwrap();

        assert_eq!(
            dashboard.status_boxes,
            vec![
                StatusBox { status: "Open".to_string(), count: 3 },
                StatusBox { status: "Closed".to_string(), count: 3 },
            ]
        );
        assert_eq!(dashboard.table.row_keys(), vec!["alice", "bob"]);
        assert_eq!(
            dashboard.table.totals_row,
            vec![PivotCell::new("Open", 3), PivotCell::new("Closed", 3)]
        );
        assert_eq!(dashboard.table.grand_total, 6);
        assert!(dashboard.is_consistent());
    }

    #[test]
    fn test_status_boxes_match_totals_row() {
        let dashboard = StatusPivotBuilder::default().build(&open_closed_data()).unwrap();

        for cell in &dashboard.table.totals_row {
            assert_eq!(dashboard.status_box(&cell.category).map(|b| b.count), Some(cell.count));
        }
    }

    #[test]
    fn test_status_boxes_follow_totals_order_not_columns() {
        let mut data = open_closed_data();
        data.status_totals = IndexMap::from([("Closed".to_string(), 3), ("Open".to_string(), 3)]);

        let dashboard = StatusPivotBuilder::default().build(&data).unwrap();

        let order: Vec<&str> = dashboard.status_boxes.iter().map(|b| b.status.as_str()).collect();
        assert_eq!(order, vec!["Closed", "Open"]);
        assert_eq!(dashboard.table.columns, category_keys(["Open", "Closed"]));
    }

    #[test]
    fn test_divergent_source_is_reported_not_rejected() {
        let mut data = open_closed_data();
        data.status_totals.insert("Open".to_string(), 10);
        data.status_totals.shift_remove("Closed");
        data.grand_total = 99;

        let dashboard = StatusPivotBuilder::default().build(&data).unwrap();

        assert_eq!(
            dashboard.consistency_issues(),
            vec![
                ConsistencyIssue::StatusTotalMismatch {
                    status: "Open".to_string(),
                    boxed: 10,
                    tabulated: 3,
                },
                ConsistencyIssue::MissingStatusBox {
                    status: "Closed".to_string(),
                    tabulated: 3,
                },
                ConsistencyIssue::GrandTotalMismatch {
                    reported: 99,
                    tabulated: 6,
                },
            ]
        );
    }

    #[test]
    fn test_negative_status_total_rejected() {
        let mut data = open_closed_data();
        data.status_totals.insert("Open".to_string(), -2);

        let err = StatusPivotBuilder::default().build(&data).unwrap_err();

        assert_eq!(
            err,
            ValidationError::NegativeTotal {
                category: "Open".to_string(),
                count: -2,
            }
        );
    }

    #[test]
    fn test_empty_snapshot() {
        let dashboard = StatusPivotBuilder::default()
            .build(&StatusDashboardData::default())
            .unwrap();

        assert_eq!(dashboard, StatusDashboard::empty());
        assert!(dashboard.is_consistent());
    }
}
