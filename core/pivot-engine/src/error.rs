//! FILENAME: core/pivot-engine/src/error.rs

use thiserror::Error;

/// Malformed input handed to the aggregator. Always a producer bug upstream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Negative count {count} for row '{row}', category '{category}'")]
    NegativeCount {
        row: String,
        category: String,
        count: i64,
    },

    #[error("Negative total {count} for category '{category}'")]
    NegativeTotal { category: String, count: i64 },

    #[error("Row '{row}' references unknown column '{category}'")]
    UnknownColumn { row: String, category: String },

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Count overflow while totalling row '{0}'")]
    CountOverflow(String),
}
