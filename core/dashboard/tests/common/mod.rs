//! FILENAME: tests/common/mod.rs
//! Scripted provider and lead fixtures for dashboard integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dashboard::{
    DashboardConfig, DashboardDataProvider, DashboardRequest, DataSourceError,
    LabelFieldDashboardData, StatusDashboardData, UserRecord,
};
use serde_json::json;

// ============================================================================
// SCRIPTED PROVIDER
// ============================================================================

/// One scripted response: wait `delay`, then return `result`.
pub struct Step<T> {
    pub delay: Duration,
    pub result: Result<T, DataSourceError>,
}

impl<T> Step<T> {
    pub fn ok(value: T) -> Self {
        Step { delay: Duration::ZERO, result: Ok(value) }
    }

    pub fn delayed(delay_ms: u64, value: T) -> Self {
        Step { delay: Duration::from_millis(delay_ms), result: Ok(value) }
    }

    pub fn fail(message: &str) -> Self {
        Step {
            delay: Duration::ZERO,
            result: Err(DataSourceError::Request(message.to_string())),
        }
    }

    /// Never answers within any sensible timeout.
    pub fn hang() -> Self {
        Step {
            delay: Duration::from_secs(3600),
            result: Err(DataSourceError::Request("hung".to_string())),
        }
    }
}

/// Provider that replays queued responses in call order.
///
/// A step is taken from the queue when the call starts, so concurrent calls
/// get steps in the order they were issued. An exhausted queue fails.
#[derive(Default)]
pub struct ScriptedProvider {
    status: Mutex<VecDeque<Step<StatusDashboardData>>>,
    labels: Mutex<VecDeque<Step<LabelFieldDashboardData>>>,
    users: Mutex<VecDeque<Step<Vec<UserRecord>>>>,
    requests: Mutex<Vec<DashboardRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, step: Step<StatusDashboardData>) -> &Self {
        self.status.lock().unwrap().push_back(step);
        self
    }

    pub fn push_labels(&self, step: Step<LabelFieldDashboardData>) -> &Self {
        self.labels.lock().unwrap().push_back(step);
        self
    }

    pub fn push_users(&self, step: Step<Vec<UserRecord>>) -> &Self {
        self.users.lock().unwrap().push_back(step);
        self
    }

    /// Every request received, in call order.
    pub fn requests(&self) -> Vec<DashboardRequest> {
        self.requests.lock().unwrap().clone()
    }

    async fn play<T>(queue: &Mutex<VecDeque<Step<T>>>) -> Result<T, DataSourceError> {
        let step = queue.lock().unwrap().pop_front();
        match step {
            Some(step) => {
                if !step.delay.is_zero() {
                    tokio::time::sleep(step.delay).await;
                }
                step.result
            }
            None => Err(DataSourceError::Request("no scripted response".to_string())),
        }
    }
}

#[async_trait]
impl DashboardDataProvider for ScriptedProvider {
    async fn fetch_status_data(
        &self,
        request: &DashboardRequest,
    ) -> Result<StatusDashboardData, DataSourceError> {
        self.requests.lock().unwrap().push(request.clone());
        Self::play(&self.status).await
    }

    async fn fetch_label_field_data(
        &self,
        request: &DashboardRequest,
    ) -> Result<LabelFieldDashboardData, DataSourceError> {
        self.requests.lock().unwrap().push(request.clone());
        Self::play(&self.labels).await
    }

    async fn fetch_users(&self) -> Result<Vec<UserRecord>, DataSourceError> {
        Self::play(&self.users).await
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// A small lead dashboard: two owners, three statuses, two picklist fields.
pub struct LeadFixture;

impl LeadFixture {
    pub fn config() -> DashboardConfig {
        DashboardConfig::new("Lead", "Status", "CreatedDate")
            .with_picklist_fields(["Lead_Source__c", "Rating__c"])
            .with_request_timeout_ms(1_000)
    }

    pub fn statuses() -> Vec<&'static str> {
        vec!["Open - Not Contacted", "Working - Contacted", "Closed - Converted"]
    }

    pub fn status_data() -> StatusDashboardData {
        serde_json::from_value(json!({
            "statusTotals": {
                "Open - Not Contacted": 4,
                "Working - Contacted": 3,
                "Closed - Converted": 2
            },
            "statuses": ["Open - Not Contacted", "Working - Contacted", "Closed - Converted"],
            "userStatusMap": {
                "Priya Nair": {"Open - Not Contacted": 3, "Closed - Converted": 2},
                "Marcus Lee": {"Open - Not Contacted": 1, "Working - Contacted": 3}
            },
            "grandTotal": 9
        }))
        .unwrap()
    }

    /// Same statuses, only one owner left after filtering.
    pub fn filtered_status_data() -> StatusDashboardData {
        serde_json::from_value(json!({
            "statusTotals": {"Open - Not Contacted": 1, "Working - Contacted": 3},
            "statuses": ["Open - Not Contacted", "Working - Contacted", "Closed - Converted"],
            "userStatusMap": {
                "Marcus Lee": {"Open - Not Contacted": 1, "Working - Contacted": 3}
            },
            "grandTotal": 4
        }))
        .unwrap()
    }

    pub fn label_data() -> LabelFieldDashboardData {
        serde_json::from_value(json!({
            "tables": {
                "Lead_Source__c": {
                    "picklistValues": ["Web", "Phone Inquiry", "Partner Referral"],
                    "userData": {
                        "Priya Nair": {"Web": 4, "Partner Referral": 1},
                        "Marcus Lee": {"Phone Inquiry": 4}
                    }
                },
                "Rating__c": {
                    "picklistValues": ["Hot", "Warm", "Cold"],
                    "userData": {
                        "Marcus Lee": {"Warm": 2, "Cold": 2},
                        "Priya Nair": {"Hot": 5}
                    }
                }
            }
        }))
        .unwrap()
    }

    pub fn users() -> Vec<UserRecord> {
        vec![
            UserRecord::new("005Q000001", "Priya Nair"),
            UserRecord::new("005Q000002", "Marcus Lee"),
        ]
    }
}
