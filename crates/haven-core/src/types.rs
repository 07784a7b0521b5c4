//! # Domain Types
//!
//! Core domain types used throughout Haven.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Listing      │   │    Booking      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  host_id (FK)   │◄──│  listing_id(FK) │       │
//! │  │  username       │   │  name           │   │  guest_id (FK)  │       │
//! │  │  role           │   │  price cents    │   │  start/end date │       │
//! │  └─────────────────┘   └────────┬────────┘   │  status         │       │
//! │                                 │            └─────────────────┘       │
//! │                        ┌────────▼────────┐   ┌─────────────────┐       │
//! │                        │     Review      │   │  BookingStatus  │       │
//! │                        │  ─────────────  │   │  ─────────────  │       │
//! │                        │  listing_id(FK) │   │  Pending        │       │
//! │                        │  rating 1..=5   │   │  Confirmed      │       │
//! │                        └─────────────────┘   │  Canceled       │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Listings own their bookings and reviews for lifecycle purposes (cascade
//! delete). Guests author them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// User Role
// =============================================================================

/// Classification of a user account.
///
/// Every user has exactly one role; there is no "unknown" fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Offers listings.
    Host,
    /// Books listings and writes reviews.
    Guest,
    /// Operator account.
    Admin,
}

impl UserRole {
    /// All roles, in declaration order.
    pub const ALL: [UserRole; 3] = [UserRole::Host, UserRole::Guest, UserRole::Admin];

    /// Database / wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Host => "host",
            UserRole::Guest => "guest",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: UserRole::ALL.iter().map(|r| r.to_string()).collect(),
            })
    }
}

// =============================================================================
// User
// =============================================================================

/// A user account (host, guest or admin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Unique login / display name.
    pub username: String,

    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

// =============================================================================
// Listing
// =============================================================================

/// A bookable property owned by a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Listing {
    /// Unique identifier (UUID v4), immutable.
    pub id: String,

    /// Owning host (FK → users.id).
    pub host_id: String,

    /// Display name shown in search results.
    pub name: String,

    pub description: String,

    /// Free-text location (city, neighbourhood, ...).
    pub location: String,

    /// Nightly rate in cents.
    pub price_per_night_cents: i64,

    /// Set once on insert.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Returns the nightly rate as Money.
    #[inline]
    pub fn price_per_night(&self) -> Money {
        Money::from_cents(self.price_per_night_cents)
    }
}

/// Fields needed to create a listing. `host_id` comes from the caller context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub host_id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub price_per_night: Money,
}

/// Partial update of a listing. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_night: Option<Money>,
}

impl ListingChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.price_per_night.is_none()
    }
}

/// A listing joined with its host's username.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ListingDetails {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub listing: Listing,
    pub host_username: String,
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle status of a booking.
///
/// ## State Machine
/// ```text
///              ┌──────────► Confirmed (terminal)
///   Pending ───┤
///              └──────────► Canceled  (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting host decision. Every booking starts here.
    Pending,
    /// Accepted by the host.
    Confirmed,
    /// Withdrawn or declined.
    Canceled,
}

impl BookingStatus {
    /// All statuses, in declaration order.
    pub const ALL: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Canceled,
    ];

    /// Database / wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Canceled => "canceled",
        }
    }

    /// Whether no further transition is possible.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }

    /// Whether `self → next` is a permitted transition.
    pub const fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Canceled)
        )
    }

    /// Returns `next` if the transition is permitted.
    ///
    /// ## Example
    /// ```rust
    /// use haven_core::BookingStatus;
    ///
    /// assert!(BookingStatus::Pending.transition_to(BookingStatus::Confirmed).is_ok());
    /// assert!(BookingStatus::Confirmed.transition_to(BookingStatus::Canceled).is_err());
    /// ```
    pub fn transition_to(self, next: BookingStatus) -> CoreResult<BookingStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidStatusTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: BookingStatus::ALL.iter().map(|s| s.to_string()).collect(),
            })
    }
}

// =============================================================================
// Booking
// =============================================================================

/// A reservation of a listing by a guest for `[start_date, end_date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Booking {
    pub id: String,

    /// Booked listing (FK → listings.id, cascade).
    pub listing_id: String,

    /// Guest who booked (FK → users.id).
    pub guest_id: String,

    /// Check-in day.
    #[ts(as = "String")]
    pub start_date: NaiveDate,

    /// Check-out day (exclusive).
    #[ts(as = "String")]
    pub end_date: NaiveDate,

    /// nightly rate × nights, in cents.
    pub total_price_cents: i64,

    pub status: BookingStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Returns the total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }

    /// Whole nights between start and end date.
    #[inline]
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// A booking request. `guest_id` comes from the caller context.
///
/// `total_price` is optional: when present it is an assertion checked against
/// the computed total, never a value that gets stored as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub listing_id: String,
    pub guest_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Option<Money>,
}

/// A booking joined with its listing name and guest username.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BookingDetails {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub booking: Booking,
    pub listing_name: String,
    pub guest_username: String,
}

// =============================================================================
// Review
// =============================================================================

/// A guest's rating and optional comment on a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Review {
    pub id: String,
    pub listing_id: String,
    pub guest_id: String,

    /// 1..=5
    pub rating: i64,

    pub comment: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A review submission. `guest_id` comes from the caller context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub listing_id: String,
    pub guest_id: String,
    pub rating: i64,
    pub comment: Option<String>,
}

/// A review joined with its listing name and guest username.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReviewDetails {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub review: Review,
    pub listing_name: String,
    pub guest_username: String,
}

/// Aggregate rating for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RatingSummary {
    pub review_count: i64,
    /// `None` when the listing has no reviews.
    pub average_rating: Option<f64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_booking_status_default() {
        assert_eq!(BookingStatus::default(), BookingStatus::Pending);
    }

    #[test]
    fn test_status_transitions() {
        use BookingStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Canceled));

        assert!(!Pending.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Canceled));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Canceled.can_transition_to(Confirmed));
        assert!(!Canceled.can_transition_to(Canceled));

        assert!(Confirmed.is_terminal());
        assert!(Canceled.is_terminal());
        assert!(!Pending.is_terminal());
    }

    #[test]
    fn test_transition_to_reports_both_states() {
        let err = BookingStatus::Canceled
            .transition_to(BookingStatus::Confirmed)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidStatusTransition {
                from: BookingStatus::Canceled,
                to: BookingStatus::Confirmed,
            }
        );
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in BookingStatus::ALL {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_role_parsing_is_total() {
        assert_eq!("host".parse::<UserRole>().unwrap(), UserRole::Host);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("".parse::<UserRole>().is_err());
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BookingStatus::Canceled).unwrap();
        assert_eq!(json, "\"canceled\"");
    }

    #[test]
    fn test_booking_nights_and_total() {
        let booking = Booking {
            id: "b".to_string(),
            listing_id: "l".to_string(),
            guest_id: "g".to_string(),
            start_date: date(2024, 2, 27),
            end_date: date(2024, 3, 2),
            total_price_cents: 40000,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };
        // 2024 is a leap year: Feb 27, 28, 29, Mar 1
        assert_eq!(booking.nights(), 4);
        assert_eq!(booking.total_price().to_string(), "400.00");
    }

    #[test]
    fn test_listing_changes_is_empty() {
        assert!(ListingChanges::default().is_empty());
        let changes = ListingChanges {
            location: Some("Lisbon".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
