//! # Error Types
//!
//! Domain-specific error types for haven-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  haven-core errors (this file)                                         │
//! │  ├── CoreError        - Booking/review rule violations                 │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  haven-db errors (separate crate)                                      │
//! │  └── DbError          - NotFound, constraint violations                │
//! │                                                                         │
//! │  haven-api errors                                                      │
//! │  └── ApiError         - What callers see (code + message)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Caller       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All variants here describe caller input errors. None of them is transient,
//! so none of them is ever retried.

use chrono::NaiveDate;
use thiserror::Error;

use crate::money::Money;
use crate::types::BookingStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The booking's end date is not after its start date.
    ///
    /// ## When This Occurs
    /// - `start_date >= end_date`
    /// - The computed night count is zero or negative
    /// - Either date falls outside years 1..=9999
    #[error("Invalid date range: end date {end_date} must be after start date {start_date}")]
    InvalidDateRange {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    /// The caller asserted a total price that differs from the computed one.
    ///
    /// ## User Workflow
    /// ```text
    /// Listing: 100.00 / night
    /// Request: 2024-01-01 → 2024-01-04, total_price = 250.00
    ///      │
    ///      ▼
    /// expected = 100.00 × 3 = 300.00
    ///      │
    ///      ▼
    /// PriceMismatch { expected: 300.00, provided: 250.00 }
    /// ```
    #[error("Total price mismatch: expected {expected}, got {provided}")]
    PriceMismatch { expected: Money, provided: Money },

    /// The nightly rate times the night count does not fit in the price column.
    #[error("Total price overflows for {nights} nights at {price_per_night}")]
    PriceOverflow { price_per_night: Money, nights: i64 },

    /// Review rating is outside 1..=5.
    #[error("Rating must be between 1 and 5, got {rating}")]
    InvalidRating { rating: i64 },

    /// Booking status cannot move from `from` to `to`.
    #[error("Cannot change booking status from {from} to {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., username characters, malformed price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_mismatch_message_reports_both_values() {
        let err = CoreError::PriceMismatch {
            expected: Money::from_cents(30000),
            provided: Money::from_cents(25000),
        };
        assert_eq!(
            err.to_string(),
            "Total price mismatch: expected 300.00, got 250.00"
        );
    }

    #[test]
    fn test_date_range_message() {
        let err = CoreError::InvalidDateRange {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: end date 2024-01-01 must be after start date 2024-01-04"
        );
    }

    #[test]
    fn test_status_transition_message() {
        let err = CoreError::InvalidStatusTransition {
            from: BookingStatus::Confirmed,
            to: BookingStatus::Canceled,
        };
        assert_eq!(
            err.to_string(),
            "Cannot change booking status from confirmed to canceled"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(validation_err.to_string(), "name is required");

        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
