//! FILENAME: core/dashboard/src/provider.rs
//! The backend collaborator that produces raw grouped counts.

use async_trait::async_trait;

use crate::error::DataSourceError;
use crate::types::{DashboardRequest, LabelFieldDashboardData, StatusDashboardData, UserRecord};

/// Source of dashboard snapshots.
///
/// Implementations own transport, retries and record filtering. The dashboard
/// only bounds each call with a timeout and never retries on its own.
#[async_trait]
pub trait DashboardDataProvider: Send + Sync {
    /// Status totals plus the user-by-status counts.
    async fn fetch_status_data(
        &self,
        request: &DashboardRequest,
    ) -> Result<StatusDashboardData, DataSourceError>;

    /// User-by-value counts for every configured picklist field.
    async fn fetch_label_field_data(
        &self,
        request: &DashboardRequest,
    ) -> Result<LabelFieldDashboardData, DataSourceError>;

    /// Users available for the owner filter.
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, DataSourceError>;
}
