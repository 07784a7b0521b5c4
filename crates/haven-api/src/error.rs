//! # API Error Type
//!
//! Unified error type for presentation-layer operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Haven                                  │
//! │                                                                         │
//! │  Caller JSON ──► serde ──── malformed ──────────► VALIDATION_ERROR      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CoreError (pricing, rating, status, fields)                           │
//! │       ├── InvalidDateRange ───────────────────► INVALID_DATE_RANGE     │
//! │       ├── PriceMismatch ──────────────────────► PRICE_MISMATCH         │
//! │       ├── InvalidRating ──────────────────────► INVALID_RATING         │
//! │       ├── InvalidStatusTransition ────────────► INVALID_STATUS_TRANSITION│
//! │       └── Validation ─────────────────────────► VALIDATION_ERROR       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError                                                               │
//! │       ├── Unique / ForeignKey / Check ────────► CONSTRAINT_VIOLATION   │
//! │       ├── NotFound ───────────────────────────► NOT_FOUND              │
//! │       ├── connection, query, pool ────────────► DATABASE_ERROR         │
//! │       └── Internal (decode, I/O, ...) ────────► INTERNAL               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use serde_json::json;

use haven_core::CoreError;
use haven_db::DbError;

/// Error returned from every operation.
///
/// ## Serialization
/// ```json
/// {
///   "code": "PRICE_MISMATCH",
///   "message": "Total price mismatch: expected 300.00, got 250.00",
///   "details": { "expected": "300.00", "provided": "250.00" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Structured context for some codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Booking start date not before end date (400)
    InvalidDateRange,

    /// Supplied booking total differs from the computed one (400)
    PriceMismatch,

    /// Review rating outside 1..=5 (400)
    InvalidRating,

    /// Booking status change not allowed (409)
    InvalidStatusTransition,

    /// Input validation failed (400)
    ValidationError,

    /// Duplicate booking or dangling reference (409)
    ConstraintViolation,

    /// Resource not found (404)
    NotFound,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attaches structured details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Rule(core) => core.into(),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ConstraintViolation,
                format!("{} '{}' already exists", field, value),
            )
            .with_details(json!({ "field": field })),
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::new(
                    ErrorCode::ConstraintViolation,
                    "Referenced host, guest or listing does not exist",
                )
            }
            DbError::CheckViolation { message } => {
                tracing::warn!("Check constraint violation: {}", message);
                ApiError::new(ErrorCode::ConstraintViolation, "Stored value out of range")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::internal("Internal error")
            }
        }
    }
}

/// Converts core errors to API errors. Messages are passed through verbatim.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvalidDateRange {
                start_date,
                end_date,
            } => ApiError::new(ErrorCode::InvalidDateRange, message)
                .with_details(json!({ "start_date": start_date, "end_date": end_date })),
            CoreError::PriceMismatch { expected, provided } => {
                ApiError::new(ErrorCode::PriceMismatch, message)
                    .with_details(json!({ "expected": expected, "provided": provided }))
            }
            CoreError::PriceOverflow { .. } => ApiError::validation(message),
            CoreError::InvalidRating { rating } => ApiError::new(ErrorCode::InvalidRating, message)
                .with_details(json!({ "rating": rating })),
            CoreError::InvalidStatusTransition { from, to } => {
                ApiError::new(ErrorCode::InvalidStatusTransition, message)
                    .with_details(json!({ "from": from, "to": to }))
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Malformed input JSON (wrong types, missing fields, float prices, ...).
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::validation(format!("Invalid input: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use haven_core::{BookingStatus, Money};

    #[test]
    fn test_price_mismatch_details() {
        let err: ApiError = CoreError::PriceMismatch {
            expected: Money::from_cents(30_000),
            provided: Money::from_cents(25_000),
        }
        .into();

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "PRICE_MISMATCH");
        assert_eq!(json["details"]["expected"], "300.00");
        assert_eq!(json["details"]["provided"], "250.00");
    }

    #[test]
    fn test_db_rule_unwraps_to_core_code() {
        let err: ApiError = DbError::Rule(CoreError::InvalidStatusTransition {
            from: BookingStatus::Confirmed,
            to: BookingStatus::Canceled,
        })
        .into();

        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        assert_eq!(err.message, "Cannot change booking status from confirmed to canceled");
    }

    #[test]
    fn test_constraint_codes() {
        let dup: ApiError = DbError::duplicate("bookings.listing_id", "x").into();
        assert_eq!(dup.code, ErrorCode::ConstraintViolation);

        let fk: ApiError = DbError::missing_reference("listing", "x").into();
        assert_eq!(fk.code, ErrorCode::ConstraintViolation);

        let internal: ApiError = DbError::Internal("column decode failed".to_string()).into();
        assert_eq!(internal.code, ErrorCode::Internal);
        assert_eq!(internal.message, "Internal error");
        assert_eq!(serde_json::to_value(&internal).unwrap()["code"], "INTERNAL");

        let missing: ApiError = DbError::not_found("Booking", "x").into();
        assert_eq!(missing.code, ErrorCode::NotFound);
        assert!(serde_json::to_value(&missing).unwrap().get("details").is_none());
    }
}
