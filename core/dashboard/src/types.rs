//! FILENAME: core/dashboard/src/types.rs
//! Wire shapes exchanged with the backend data provider.
//!
//! All payloads are camelCase JSON. Object key order is significant (it
//! decides row and status-box order), so maps deserialize into `IndexMap`.

use chrono::NaiveDate;
use indexmap::IndexMap;
use pivot_engine::{CategoryKey, RawGroupedCounts};
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::error::DataSourceError;

// ============================================================================
// RESPONSES
// ============================================================================

/// Status dimension snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDashboardData {
    /// Per-status totals as the source computed them.
    #[serde(default)]
    pub status_totals: IndexMap<CategoryKey, i64>,

    /// Column order for the status pivot.
    #[serde(default)]
    pub statuses: Vec<CategoryKey>,

    /// User -> status -> count.
    #[serde(default)]
    pub user_status_map: RawGroupedCounts,

    /// The source's own grand total. Kept for cross-checking only.
    #[serde(default)]
    pub grand_total: i64,
}

impl StatusDashboardData {
    pub fn from_json(json: &str) -> Result<Self, DataSourceError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One picklist field's raw counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTableData {
    /// Column order for this field's pivot.
    #[serde(default)]
    pub picklist_values: Vec<CategoryKey>,

    /// User -> picklist value -> count.
    #[serde(default)]
    pub user_data: RawGroupedCounts,
}

/// Multi-field snapshot, keyed by field API name in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelFieldDashboardData {
    #[serde(default)]
    pub tables: IndexMap<String, FieldTableData>,
}

impl LabelFieldDashboardData {
    pub fn from_json(json: &str) -> Result<Self, DataSourceError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A user that can own records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        UserRecord {
            id: id.into(),
            name: name.into(),
        }
    }
}

// ============================================================================
// REQUESTS
// ============================================================================

/// Per-call filters. The dashboard never stores them; each refresh gets its
/// own copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilters {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// Owner id; `None` or an empty string means all owners.
    pub owner_id: Option<String>,
}

impl DashboardFilters {
    pub fn between(from_date: NaiveDate, to_date: NaiveDate) -> Self {
        DashboardFilters {
            from_date: Some(from_date),
            to_date: Some(to_date),
            owner_id: None,
        }
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }
}

/// Everything a provider needs to produce one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRequest {
    pub object_api_name: String,
    pub status_field_api: String,
    pub date_field_api: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub owner_id: Option<String>,
    pub dashboard_picklist_fields: Vec<String>,
}

impl DashboardRequest {
    pub fn new(config: &DashboardConfig, filters: &DashboardFilters) -> Self {
        let owner_id = filters
            .owner_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        DashboardRequest {
            object_api_name: config.object_api_name.clone(),
            status_field_api: config.status_field_api.clone(),
            date_field_api: config.date_field_api.clone(),
            from_date: filters.from_date,
            to_date: filters.to_date,
            owner_id,
            dashboard_picklist_fields: config.dashboard_picklist_fields.clone(),
        }
    }
}
