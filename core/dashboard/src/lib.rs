//! FILENAME: core/dashboard/src/lib.rs
//! Record-count dashboards built on `pivot-engine`.
//!
//! Two pipelines share the same aggregator:
//! - `status`: status boxes plus a user-by-status cross-tab
//! - `label_fields`: one user-by-value cross-tab per configured picklist field
//!
//! `state` fetches snapshots from a `DashboardDataProvider`, builds the tables
//! and publishes them as immutable `Arc` values.

pub mod logging;
pub mod error;
pub mod config;
pub mod types;
pub mod provider;
pub mod status;
pub mod label_fields;
pub mod users;
pub mod state;

pub use config::{parse_field_list, DashboardConfig, DEFAULT_REQUEST_TIMEOUT_MS};
pub use error::{DashboardError, DataSourceError};
pub use label_fields::{field_label, LabelFieldPivotBuilder, CUSTOM_FIELD_SUFFIX};
pub use provider::DashboardDataProvider;
pub use state::{DashboardRefresh, DashboardState, RefreshOutcome, Snapshot};
pub use status::{status_boxes, ConsistencyIssue, StatusBox, StatusDashboard, StatusPivotBuilder};
pub use types::{
    DashboardFilters, DashboardRequest, FieldTableData, LabelFieldDashboardData,
    StatusDashboardData, UserRecord,
};
pub use users::{user_options, UserOption, ALL_USERS_LABEL};

pub use pivot_engine::{
    aggregate, FieldPivot, MultiFieldPivotSet, PivotAggregator, PivotCell, PivotRow, PivotTable,
    ValidationError,
};
