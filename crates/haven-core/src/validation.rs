//! # Validation Module
//!
//! Input validation for Haven entities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: haven-api (deserialization)                                  │
//! │  ├── Type validation (dates, decimal prices)                           │
//! │  └── Unknown / server-owned fields ignored                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE + pricing                                        │
//! │  ├── Required / length checks                                          │
//! │  ├── Rating bounds                                                     │
//! │  └── Date range + price derivation (pricing.rs)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (listing, guest, start_date, end_date)                     │
//! │  └── Foreign keys with ON DELETE CASCADE                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{ListingChanges, NewListing, NewReview, NewUser};
use crate::{MAX_LISTING_NAME_LENGTH, MAX_LOCATION_LENGTH, MAX_RATING, MAX_USERNAME_LENGTH, MIN_RATING};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn require_text(field: &str, value: &str, max: Option<usize>) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if let Some(max) = max {
        if value.chars().count() > max {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max,
            });
        }
    }

    Ok(())
}

/// Validates a listing name (1-255 characters).
///
/// ## Example
/// ```rust
/// use haven_core::validation::validate_listing_name;
///
/// assert!(validate_listing_name("Sunny loft near the river").is_ok());
/// assert!(validate_listing_name("   ").is_err());
/// ```
pub fn validate_listing_name(name: &str) -> ValidationResult<()> {
    require_text("name", name, Some(MAX_LISTING_NAME_LENGTH))
}

/// Validates a listing location (1-255 characters).
pub fn validate_location(location: &str) -> ValidationResult<()> {
    require_text("location", location, Some(MAX_LOCATION_LENGTH))
}

/// Validates a listing description (required, no length limit).
pub fn validate_description(description: &str) -> ValidationResult<()> {
    require_text("description", description, None)
}

/// Validates a username.
///
/// ## Rules
/// - 1-150 characters after trimming
/// - Letters, digits and `@ . + - _` only; surrounding whitespace is ignored
pub fn validate_username(username: &str) -> ValidationResult<()> {
    require_text("username", username, Some(MAX_USERNAME_LENGTH))?;

    if !username
        .trim()
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "may contain only letters, digits and @/./+/-/_".to_string(),
        });
    }

    Ok(())
}

/// Normalizes an optional review comment: blank text becomes `None`.
pub fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment.filter(|c| !c.trim().is_empty())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a nightly rate.
///
/// ## Rules
/// - Must be non-negative; zero is allowed
///
/// ## Example
/// ```rust
/// use haven_core::{validation::validate_price_per_night, Money};
///
/// assert!(validate_price_per_night(Money::from_cents(12_500)).is_ok());
/// assert!(validate_price_per_night(Money::zero()).is_ok());
/// assert!(validate_price_per_night(Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price_per_night(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price_per_night".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a review rating.
///
/// ## Rules
/// - Integer in `1..=5`
///
/// ## Example
/// ```rust
/// use haven_core::validation::validate_rating;
///
/// assert!(validate_rating(5).is_ok());
/// assert!(validate_rating(6).is_err());
/// ```
pub fn validate_rating(rating: i64) -> CoreResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::InvalidRating { rating });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates every field of a new user.
pub fn validate_new_user(user: &NewUser) -> ValidationResult<()> {
    validate_username(&user.username)?;
    require_text("email", &user.email, None)?;
    Ok(())
}

/// Validates every field of a new listing.
///
/// `host_id` is not checked here: an unknown host, like an unknown guest or
/// listing on a booking, is a foreign-key violation in the store.
pub fn validate_new_listing(listing: &NewListing) -> ValidationResult<()> {
    validate_listing_name(&listing.name)?;
    validate_description(&listing.description)?;
    validate_location(&listing.location)?;
    validate_price_per_night(listing.price_per_night)
}

/// Validates only the fields present in a listing update.
pub fn validate_listing_changes(changes: &ListingChanges) -> ValidationResult<()> {
    if let Some(name) = &changes.name {
        validate_listing_name(name)?;
    }
    if let Some(description) = &changes.description {
        validate_description(description)?;
    }
    if let Some(location) = &changes.location {
        validate_location(location)?;
    }
    if let Some(price) = changes.price_per_night {
        validate_price_per_night(price)?;
    }
    Ok(())
}

/// Validates a review submission.
pub fn validate_new_review(review: &NewReview) -> CoreResult<()> {
    validate_rating(review.rating)
}

// =============================================================================
// Unit Tests
// =============================================================================
