// Error taxonomy - one variant per failure kind the core can signal
// The core never aborts the process; callers decide whether to re-prompt.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeskError {
    /// No tariff covers this zone/weight pair. Callers must abort the
    /// operation, never substitute a default price.
    #[error("no price for {weight} kg to {zone}")]
    Pricing { zone: String, weight: Decimal },

    /// Unknown customer, consignment, pricing zone, or user.
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },

    /// Date range with start after end.
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Malformed input caught at the boundary (negative weight, bad date...).
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Persistence failure other than "file absent". Never masked.
    #[error("storage failure on {path}: {message}")]
    Storage { path: String, message: String },
}

impl DeskError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        DeskError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        DeskError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
