//! FILENAME: core/dashboard/src/error.rs

use pivot_engine::ValidationError;
use thiserror::Error;

/// The backend collaborator could not deliver a snapshot.
///
/// Recovered at the refresh boundary: logged, and the previously published
/// tables stay current.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Invalid response payload: {0}")]
    InvalidPayload(String),
}

impl From<serde_json::Error> for DataSourceError {
    fn from(err: serde_json::Error) -> Self {
        DataSourceError::InvalidPayload(err.to_string())
    }
}

/// Errors surfaced to the caller of a dashboard operation.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
