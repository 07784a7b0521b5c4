//! # Listing Repository
//!
//! Database operations for listings.
//!
//! ## Key Operations
//! - CRUD with partial update (`updated_at` refreshed on every change)
//! - Host username resolved by join for presentation
//! - Cascading delete of bookings and reviews
//!
//! ## Delete Cascade
//! ```text
//! DELETE FROM listings WHERE id = ?
//!        │
//!        ├──► bookings  (ON DELETE CASCADE)
//!        └──► reviews   (ON DELETE CASCADE)
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::begin_write;
use haven_core::validation::{validate_listing_changes, validate_new_listing};
use haven_core::{Listing, ListingChanges, ListingDetails, NewListing};

const LISTING_COLUMNS: &str = r#"
    l.id, l.host_id, l.name, l.description, l.location,
    l.price_per_night_cents, l.created_at, l.updated_at
"#;

/// Repository for listing database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.listings();
///
/// let listing = repo.create(&new_listing).await?;
/// let details = repo.get_details(&listing.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ListingRepository {
    pool: SqlitePool,
}

impl ListingRepository {
    /// Creates a new ListingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ListingRepository { pool }
    }

    /// Creates a listing in its own transaction.
    ///
    /// ## Errors
    /// * `DbError::Rule` - a field failed validation
    /// * `DbError::ForeignKeyViolation` - host does not exist
    pub async fn create(&self, new_listing: &NewListing) -> DbResult<Listing> {
        let mut tx = begin_write(&self.pool).await?;
        let listing = Self::create_in(&mut *tx, new_listing).await?;
        tx.commit().await?;
        Ok(listing)
    }

    /// Creates a listing on a caller-owned connection or transaction.
    pub async fn create_in(
        conn: &mut SqliteConnection,
        new_listing: &NewListing,
    ) -> DbResult<Listing> {
        validate_new_listing(new_listing)?;

        let now = Utc::now();
        let listing = Listing {
            id: Uuid::new_v4().to_string(),
            host_id: new_listing.host_id.clone(),
            name: new_listing.name.trim().to_string(),
            description: new_listing.description.clone(),
            location: new_listing.location.trim().to_string(),
            price_per_night_cents: new_listing.price_per_night.cents(),
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %listing.id,
            host_id = %listing.host_id,
            price = %new_listing.price_per_night,
            "Creating listing"
        );

        sqlx::query(
            r#"
            INSERT INTO listings (
                id, host_id, name, description, location,
                price_per_night_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&listing.id)
        .bind(&listing.host_id)
        .bind(&listing.name)
        .bind(&listing.description)
        .bind(&listing.location)
        .bind(listing.price_per_night_cents)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(listing)
    }

    /// Gets a listing by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Listing))` - Listing found
    /// * `Ok(None)` - Listing not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Listing>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_by_id_in(&mut *conn, id).await
    }

    /// Gets a listing by ID on a caller-owned connection.
    pub async fn get_by_id_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Listing>> {
        let listing = sqlx::query_as::<_, Listing>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings l WHERE l.id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(listing)
    }

    /// Gets a listing together with its host's username.
    pub async fn get_details(&self, id: &str) -> DbResult<Option<ListingDetails>> {
        let details = sqlx::query_as::<_, ListingDetails>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}, u.username AS host_username
            FROM listings l
            INNER JOIN users u ON u.id = l.host_id
            WHERE l.id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(details)
    }

    /// Lists all listings with host usernames, newest first.
    pub async fn list_details(&self) -> DbResult<Vec<ListingDetails>> {
        let listings = sqlx::query_as::<_, ListingDetails>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}, u.username AS host_username
            FROM listings l
            INNER JOIN users u ON u.id = l.host_id
            ORDER BY l.created_at DESC, l.rowid DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = listings.len(), "Listed listings");
        Ok(listings)
    }

    /// Lists the listings owned by a host, newest first.
    pub async fn list_by_host(&self, host_id: &str) -> DbResult<Vec<Listing>> {
        let listings = sqlx::query_as::<_, Listing>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM listings l
            WHERE l.host_id = ?1
            ORDER BY l.created_at DESC, l.rowid DESC
            "#
        ))
        .bind(host_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// Fields left as `None` keep their stored value. An empty change set
    /// still touches `updated_at`.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no listing with this id
    /// * `DbError::Rule` - a provided field failed validation
    pub async fn update(&self, id: &str, changes: &ListingChanges) -> DbResult<Listing> {
        validate_listing_changes(changes)?;

        let mut tx = begin_write(&self.pool).await?;

        let mut listing = Self::get_by_id_in(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Listing", id))?;

        if let Some(name) = &changes.name {
            listing.name = name.trim().to_string();
        }
        if let Some(description) = &changes.description {
            listing.description = description.clone();
        }
        if let Some(location) = &changes.location {
            listing.location = location.trim().to_string();
        }
        if let Some(price) = changes.price_per_night {
            listing.price_per_night_cents = price.cents();
        }
        listing.updated_at = Utc::now();

        debug!(id = %id, "Updating listing");

        sqlx::query(
            r#"
            UPDATE listings SET
                name = ?1,
                description = ?2,
                location = ?3,
                price_per_night_cents = ?4,
                updated_at = ?5
            WHERE id = ?6
            "#,
        )
        .bind(&listing.name)
        .bind(&listing.description)
        .bind(&listing.location)
        .bind(listing.price_per_night_cents)
        .bind(listing.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(listing)
    }

    /// Deletes a listing together with its bookings and reviews.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting listing");

        let result = sqlx::query("DELETE FROM listings WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Listing", id));
        }

        Ok(())
    }

    /// Counts all listings.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
