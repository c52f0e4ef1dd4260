//! FILENAME: core/dashboard/src/label_fields.rs
//! One user-by-value cross-tab per configured picklist field.

use pivot_engine::{FieldPivot, MultiFieldPivotSet, PivotAggregator, ValidationError};

use crate::types::LabelFieldDashboardData;
use crate::{log_enter, log_error, log_exit, log_warn};

/// Suffix the backend appends to custom field API names.
pub const CUSTOM_FIELD_SUFFIX: &str = "__c";

/// Display label for a field API name: drop a trailing custom-field suffix,
/// then turn every underscore into a space.
///
/// `Region__c` -> `Region`, `Lead_Source__c` -> `Lead Source`.
pub fn field_label(field_id: &str) -> String {
    field_id
        .strip_suffix(CUSTOM_FIELD_SUFFIX)
        .unwrap_or(field_id)
        .replace('_', " ")
}

/// Adapts a multi-field snapshot into a `MultiFieldPivotSet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelFieldPivotBuilder {
    aggregator: PivotAggregator,
}

impl LabelFieldPivotBuilder {
    pub fn new(aggregator: PivotAggregator) -> Self {
        LabelFieldPivotBuilder { aggregator }
    }

    /// Builds the tables in the order the source returned them.
    ///
    /// `configured_fields` is only used to report fields the source skipped
    /// or added; every returned table is kept.
    pub fn build(
        &self,
        data: &LabelFieldDashboardData,
        configured_fields: &[String],
    ) -> Result<MultiFieldPivotSet, ValidationError> {
        log_enter!(
            "LABELS",
            "build",
            "returned={} configured={}",
            data.tables.len(),
            configured_fields.len()
        );

        for field in configured_fields {
            if !data.tables.contains_key(field) {
                log_warn!("LABELS", "configured field '{}' missing from response", field);
            }
        }

        let mut tables = Vec::with_capacity(data.tables.len());
        for (field_id, field_data) in &data.tables {
            if !configured_fields.is_empty() && !configured_fields.contains(field_id) {
                log_warn!("LABELS", "response contains unconfigured field '{}'", field_id);
            }

            let table = self
                .aggregator
                .aggregate(&field_data.picklist_values, &field_data.user_data)
                .map_err(|err| {
                    log_error!("LABELS", "field '{}' rejected: {}", field_id, err);
                    err
                })?;

            tables.push(FieldPivot {
                field_id: field_id.clone(),
                field_label: field_label(field_id),
                table,
            });
        }

        log_exit!("LABELS", "build", "tables={}", tables.len());
        Ok(MultiFieldPivotSet { tables })
    }
}
