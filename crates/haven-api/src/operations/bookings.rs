//! # Booking Operations
//!
//! ## Create Booking Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  { "listing", "guest", "start_date", "end_date", "total_price"? }       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  serde: dates YYYY-MM-DD, total as decimal string                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BookingRepository::create                                             │
//! │    ├── quote_booking (range + nightly total, assertion check)          │
//! │    └── INSERT pending (UNIQUE listing/guest/dates)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { "booking_id", "listing_name", "guest_username", "total_price",      │
//! │    "status": "pending", ... }                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `status` sent on create is ignored; it changes only through
//! [`update_booking_status`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use haven_core::{BookingDetails, BookingStatus, Money, NewBooking};
use haven_db::Database;

/// Booking request.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingInput {
    /// Listing id. Write-only.
    pub listing: String,
    /// Guest user id. Write-only.
    pub guest: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Optional; must equal nightly rate × nights when present.
    #[serde(default)]
    pub total_price: Option<Money>,
}

/// Status change request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusInput {
    pub status: BookingStatus,
}

/// Booking as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingOutput {
    pub booking_id: String,
    pub listing_name: String,
    pub guest_username: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Money,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<BookingDetails> for BookingOutput {
    fn from(d: BookingDetails) -> Self {
        BookingOutput {
            total_price: d.booking.total_price(),
            booking_id: d.booking.id,
            listing_name: d.listing_name,
            guest_username: d.guest_username,
            start_date: d.booking.start_date,
            end_date: d.booking.end_date,
            status: d.booking.status,
            created_at: d.booking.created_at,
        }
    }
}

/// Validates, prices and stores a booking.
///
/// ## Errors
/// * `INVALID_DATE_RANGE` - start date not before end date
/// * `PRICE_MISMATCH` - supplied total differs (details carry both amounts)
/// * `CONSTRAINT_VIOLATION` - duplicate booking, or listing/guest missing
pub async fn create_booking(db: &Database, input: BookingInput) -> ApiResult<BookingOutput> {
    let booking = db
        .bookings()
        .create(&NewBooking {
            listing_id: input.listing,
            guest_id: input.guest,
            start_date: input.start_date,
            end_date: input.end_date,
            total_price: input.total_price,
        })
        .await?;

    info!(id = %booking.id, total = %booking.total_price(), "Booking created");
    get_booking(db, &booking.id).await
}

/// Gets a booking by id.
pub async fn get_booking(db: &Database, id: &str) -> ApiResult<BookingOutput> {
    db.bookings()
        .get_details(id)
        .await?
        .map(BookingOutput::from)
        .ok_or_else(|| ApiError::not_found("Booking", id))
}

/// Lists bookings of a listing.
pub async fn list_bookings_for_listing(
    db: &Database,
    listing_id: &str,
) -> ApiResult<Vec<BookingOutput>> {
    let bookings = db.bookings().list_for_listing(listing_id).await?;
    Ok(bookings.into_iter().map(BookingOutput::from).collect())
}

/// Lists bookings made by a guest.
pub async fn list_bookings_for_guest(
    db: &Database,
    guest_id: &str,
) -> ApiResult<Vec<BookingOutput>> {
    let bookings = db.bookings().list_for_guest(guest_id).await?;
    Ok(bookings.into_iter().map(BookingOutput::from).collect())
}

/// Confirms or cancels a pending booking.
pub async fn update_booking_status(
    db: &Database,
    id: &str,
    input: StatusInput,
) -> ApiResult<BookingOutput> {
    db.bookings().update_status(id, input.status).await?;
    get_booking(db, id).await
}

/// Deletes a booking.
pub async fn delete_booking(db: &Database, id: &str) -> ApiResult<()> {
    db.bookings().delete(id).await?;
    Ok(())
}
