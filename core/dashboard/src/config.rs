//! FILENAME: core/dashboard/src/config.rs
//! Dashboard configuration: which object and fields the dashboard summarizes.

use std::time::Duration;

use pivot_engine::{AggregateMode, PivotAggregator};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DashboardError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Upper bound for a single provider request unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    /// API name of the summarized object (e.g. `Lead`).
    pub object_api_name: String,

    /// API name of the status field that drives the status pivot.
    pub status_field_api: String,

    /// API name of the date field the date-range filter applies to.
    pub date_field_api: String,

    /// Extra picklist fields, one cross-tab each. Accepts a JSON list or a
    /// comma-separated string.
    #[serde(default, deserialize_with = "deserialize_field_list")]
    pub dashboard_picklist_fields: Vec<String>,

    /// Reject counts for categories that are not columns.
    #[serde(default)]
    pub strict_columns: bool,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl DashboardConfig {
    pub fn new(
        object_api_name: impl Into<String>,
        status_field_api: impl Into<String>,
        date_field_api: impl Into<String>,
    ) -> Self {
        DashboardConfig {
            object_api_name: object_api_name.into(),
            status_field_api: status_field_api.into(),
            date_field_api: date_field_api.into(),
            dashboard_picklist_fields: Vec::new(),
            strict_columns: false,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }

    pub fn with_picklist_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dashboard_picklist_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strict_columns(mut self, strict: bool) -> Self {
        self.strict_columns = strict;
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, DashboardError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        let required = [
            ("objectApiName", &self.object_api_name),
            ("statusFieldApi", &self.status_field_api),
            ("dateFieldApi", &self.date_field_api),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(DashboardError::Config(format!("{} must not be empty", name)));
            }
        }

        if self.request_timeout_ms == 0 {
            return Err(DashboardError::Config(
                "requestTimeoutMs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn aggregator(&self) -> PivotAggregator {
        PivotAggregator::new(AggregateMode::from_strict_flag(self.strict_columns))
    }
}

// ============================================================================
// FIELD LIST PARSING
// ============================================================================

/// Splits a comma-separated field list, trimming blanks and dropping empties.
pub fn parse_field_list(fields: &str) -> Vec<String> {
    fields
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldList {
    List(Vec<String>),
    Csv(String),
}

fn deserialize_field_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match FieldList::deserialize(deserializer)? {
        FieldList::List(fields) => fields
            .iter()
            .map(|field| field.trim())
            .filter(|field| !field.is_empty())
            .map(str::to_string)
            .collect(),
        FieldList::Csv(fields) => parse_field_list(&fields),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_list() {
        assert_eq!(
            parse_field_list(" Region__c, Lead_Source__c ,,"),
            vec!["Region__c".to_string(), "Lead_Source__c".to_string()]
        );
        assert!(parse_field_list("").is_empty());
    }

    #[test]
    fn test_from_json_with_csv_fields() {
        let config = DashboardConfig::from_json(
            r#"{
                "objectApiName": "Lead",
                "statusFieldApi": "Status",
                "dateFieldApi": "CreatedDate",
                "dashboardPicklistFields": "Region__c,Lead_Source__c"
            }"#,
        )
        .unwrap();

        assert_eq!(config.dashboard_picklist_fields, vec!["Region__c", "Lead_Source__c"]);
        assert!(!config.strict_columns);
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
    }

    #[test]
    fn test_from_json_with_list_fields() {
        let config = DashboardConfig::from_json(
            r#"{
                "objectApiName": "Case",
                "statusFieldApi": "Status",
                "dateFieldApi": "CreatedDate",
                "dashboardPicklistFields": ["Priority", "Origin"],
                "strictColumns": true,
                "requestTimeoutMs": 500
            }"#,
        )
        .unwrap();

        assert_eq!(config.dashboard_picklist_fields, vec!["Priority", "Origin"]);
        assert_eq!(config.aggregator(), PivotAggregator::strict());
        assert_eq!(config.request_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_missing_picklist_fields_defaults_to_empty() {
        let config = DashboardConfig::from_json(
            r#"{"objectApiName": "Lead", "statusFieldApi": "Status", "dateFieldApi": "CreatedDate"}"#,
        )
        .unwrap();

        assert!(config.dashboard_picklist_fields.is_empty());
    }

    #[test]
    fn test_validate_rejects_blank_names() {
        let config = DashboardConfig::new("Lead", " ", "CreatedDate");

        let err = config.validate().unwrap_err();
        assert!(matches!(err, DashboardError::Config(ref msg) if msg.contains("statusFieldApi")));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = DashboardConfig::new("Lead", "Status", "CreatedDate").with_request_timeout_ms(0);

        assert!(matches!(config.validate(), Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            DashboardConfig::from_json("{"),
            Err(DashboardError::Json(_))
        ));
    }
}
