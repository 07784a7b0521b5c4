//! # Booking Repository
//!
//! Database operations for bookings.
//!
//! ## Booking Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Create Booking (one transaction)                     │
//! │                                                                         │
//! │  1. Load listing price ── missing ──► ForeignKeyViolation              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. quote_booking(price, start, end, supplied_total)                   │
//! │       ├── start >= end ───────────► InvalidDateRange                   │
//! │       └── supplied != computed ───► PriceMismatch                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. INSERT status = 'pending', total = computed                        │
//! │       └── same (listing, guest, start, end) ──► UniqueViolation        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. COMMIT                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status only ever moves `pending → confirmed` or `pending → canceled`.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::begin_write;
use haven_core::{
    quote_booking, Booking, BookingDetails, BookingStatus, CoreError, Money, NewBooking,
};

const BOOKING_COLUMNS: &str = r#"
    b.id, b.listing_id, b.guest_id, b.start_date, b.end_date,
    b.total_price_cents, b.status, b.created_at
"#;

const DETAILS_FROM: &str = r#"
    FROM bookings b
    INNER JOIN listings l ON l.id = b.listing_id
    INNER JOIN users u ON u.id = b.guest_id
"#;

/// Repository for booking database operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Validates, prices and stores a booking in its own transaction.
    ///
    /// ## Errors
    /// * `DbError::Rule(CoreError::InvalidDateRange)` - start not before end
    /// * `DbError::Rule(CoreError::PriceMismatch)` - supplied total is wrong
    /// * `DbError::ForeignKeyViolation` - listing or guest missing
    /// * `DbError::UniqueViolation` - same listing, guest and dates already booked
    ///
    /// Nothing is written when any of these occur.
    pub async fn create(&self, new_booking: &NewBooking) -> DbResult<Booking> {
        let mut tx = begin_write(&self.pool).await?;
        let booking = Self::create_in(&mut *tx, new_booking).await?;
        tx.commit().await?;
        Ok(booking)
    }

    /// Validates, prices and stores a booking on a caller-owned connection.
    pub async fn create_in(
        conn: &mut SqliteConnection,
        new_booking: &NewBooking,
    ) -> DbResult<Booking> {
        let price_cents: i64 =
            sqlx::query_scalar("SELECT price_per_night_cents FROM listings WHERE id = ?1")
                .bind(&new_booking.listing_id)
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| DbError::missing_reference("listing", &new_booking.listing_id))?;

        let quote = quote_booking(
            Money::from_cents(price_cents),
            new_booking.start_date,
            new_booking.end_date,
            new_booking.total_price,
        )
        .map_err(|e| {
            warn!(listing_id = %new_booking.listing_id, error = %e, "Booking rejected");
            e
        })?;

        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            listing_id: new_booking.listing_id.clone(),
            guest_id: new_booking.guest_id.clone(),
            start_date: new_booking.start_date,
            end_date: new_booking.end_date,
            total_price_cents: quote.total_price.cents(),
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };

        debug!(
            id = %booking.id,
            listing_id = %booking.listing_id,
            nights = quote.nights,
            total = %quote.total_price,
            "Creating booking"
        );

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, listing_id, guest_id, start_date, end_date,
                total_price_cents, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.listing_id)
        .bind(&booking.guest_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.total_price_cents)
        .bind(booking.status)
        .bind(booking.created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => {
                warn!(listing_id = %booking.listing_id, "Duplicate booking");
                DbError::duplicate(
                    field,
                    format!(
                        "{} / {} / {} → {}",
                        booking.listing_id, booking.guest_id, booking.start_date, booking.end_date
                    ),
                )
            }
            other => other,
        })?;

        Ok(booking)
    }

    /// Gets a booking by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Gets a booking with its listing name and guest username.
    pub async fn get_details(&self, id: &str) -> DbResult<Option<BookingDetails>> {
        let details = sqlx::query_as::<_, BookingDetails>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}, l.name AS listing_name, u.username AS guest_username
            {DETAILS_FROM}
            WHERE b.id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(details)
    }

    /// Lists the bookings of a listing, by check-in date.
    pub async fn list_for_listing(&self, listing_id: &str) -> DbResult<Vec<BookingDetails>> {
        let bookings = sqlx::query_as::<_, BookingDetails>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}, l.name AS listing_name, u.username AS guest_username
            {DETAILS_FROM}
            WHERE b.listing_id = ?1
            ORDER BY b.start_date, b.created_at
            "#
        ))
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Lists the bookings made by a guest, by check-in date.
    pub async fn list_for_guest(&self, guest_id: &str) -> DbResult<Vec<BookingDetails>> {
        let bookings = sqlx::query_as::<_, BookingDetails>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}, l.name AS listing_name, u.username AS guest_username
            {DETAILS_FROM}
            WHERE b.guest_id = ?1
            ORDER BY b.start_date, b.created_at
            "#
        ))
        .bind(guest_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Moves a booking to a new status.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no booking with this id
    /// * `DbError::Rule(CoreError::InvalidStatusTransition)` - not allowed from the
    ///   current status
    pub async fn update_status(&self, id: &str, next: BookingStatus) -> DbResult<Booking> {
        let mut tx = begin_write(&self.pool).await?;
        let booking = Self::update_status_in(&mut *tx, id, next).await?;
        tx.commit().await?;
        Ok(booking)
    }

    /// Moves a booking to a new status on a caller-owned connection.
    pub async fn update_status_in(
        conn: &mut SqliteConnection,
        id: &str,
        next: BookingStatus,
    ) -> DbResult<Booking> {
        let mut booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("Booking", id))?;

        let current = booking.status;
        let next = current.transition_to(next).map_err(|e| {
            warn!(id = %id, from = %current, to = %next, "Rejected status change");
            e
        })?;

        let result = sqlx::query(
            "UPDATE bookings SET status = ?1 WHERE id = ?2 AND status = ?3",
        )
        .bind(next)
        .bind(id)
        .bind(BookingStatus::Pending)
        .execute(&mut *conn)
        .await?;

        // Lost a race with another writer: report against the status it left.
        if result.rows_affected() == 0 {
            let now: BookingStatus =
                sqlx::query_scalar("SELECT status FROM bookings WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&mut *conn)
                    .await?
                    .ok_or_else(|| DbError::not_found("Booking", id))?;
            return Err(CoreError::InvalidStatusTransition { from: now, to: next }.into());
        }

        debug!(id = %id, from = %current, to = %next, "Booking status changed");

        booking.status = next;
        Ok(booking)
    }

    /// Deletes a booking.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting booking");

        let result = sqlx::query("DELETE FROM bookings WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        Ok(())
    }

    /// Counts all bookings.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
