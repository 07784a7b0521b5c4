//! # Review Repository
//!
//! Database operations for reviews. Reviews are immutable once written.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::begin_write;
use haven_core::validation::{normalize_comment, validate_new_review};
use haven_core::{NewReview, RatingSummary, Review, ReviewDetails};

const REVIEW_COLUMNS: &str =
    "r.id, r.listing_id, r.guest_id, r.rating, r.comment, r.created_at";

/// Repository for review database operations.
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    /// Creates a new ReviewRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    /// Validates and stores a review in its own transaction.
    ///
    /// ## Errors
    /// * `DbError::Rule(CoreError::InvalidRating)` - rating outside 1..=5
    /// * `DbError::ForeignKeyViolation` - listing or guest missing
    pub async fn create(&self, new_review: &NewReview) -> DbResult<Review> {
        let mut tx = begin_write(&self.pool).await?;
        let review = Self::create_in(&mut *tx, new_review).await?;
        tx.commit().await?;
        Ok(review)
    }

    /// Validates and stores a review on a caller-owned connection.
    pub async fn create_in(conn: &mut SqliteConnection, new_review: &NewReview) -> DbResult<Review> {
        validate_new_review(new_review).map_err(|e| {
            warn!(listing_id = %new_review.listing_id, error = %e, "Review rejected");
            e
        })?;

        let review = Review {
            id: Uuid::new_v4().to_string(),
            listing_id: new_review.listing_id.clone(),
            guest_id: new_review.guest_id.clone(),
            rating: new_review.rating,
            comment: normalize_comment(new_review.comment.clone()),
            created_at: Utc::now(),
        };

        debug!(id = %review.id, listing_id = %review.listing_id, rating = review.rating, "Creating review");

        sqlx::query(
            r#"
            INSERT INTO reviews (id, listing_id, guest_id, rating, comment, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&review.id)
        .bind(&review.listing_id)
        .bind(&review.guest_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(review)
    }

    /// Gets a review by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews r WHERE r.id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    /// Gets a review with its listing name and guest username.
    pub async fn get_details(&self, id: &str) -> DbResult<Option<ReviewDetails>> {
        let details = sqlx::query_as::<_, ReviewDetails>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}, l.name AS listing_name, u.username AS guest_username
            FROM reviews r
            INNER JOIN listings l ON l.id = r.listing_id
            INNER JOIN users u ON u.id = r.guest_id
            WHERE r.id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(details)
    }

    /// Lists the reviews of a listing, newest first.
    pub async fn list_for_listing(&self, listing_id: &str) -> DbResult<Vec<ReviewDetails>> {
        let reviews = sqlx::query_as::<_, ReviewDetails>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}, l.name AS listing_name, u.username AS guest_username
            FROM reviews r
            INNER JOIN listings l ON l.id = r.listing_id
            INNER JOIN users u ON u.id = r.guest_id
            WHERE r.listing_id = ?1
            ORDER BY r.created_at DESC, r.rowid DESC
            "#
        ))
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Review count and mean rating for a listing.
    pub async fn rating_summary(&self, listing_id: &str) -> DbResult<RatingSummary> {
        let (review_count, average_rating): (i64, Option<f64>) = sqlx::query_as(
            "SELECT COUNT(*), AVG(CAST(rating AS REAL)) FROM reviews WHERE listing_id = ?1",
        )
        .bind(listing_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(RatingSummary {
            review_count,
            average_rating,
        })
    }

    /// Deletes a review.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting review");

        let result = sqlx::query("DELETE FROM reviews WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Review", id));
        }

        Ok(())
    }

    /// Counts all reviews.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{listing, test_db, user};
    use haven_core::{CoreError, UserRole};

    fn review(listing_id: &str, guest_id: &str, rating: i64, comment: Option<&str>) -> NewReview {
        NewReview {
            listing_id: listing_id.to_string(),
            guest_id: guest_id.to_string(),
            rating,
            comment: comment.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_rating_bounds() {
        let db = test_db().await;
        let host = user(&db, "host", UserRole::Host).await;
        let guest = user(&db, "guest", UserRole::Guest).await;
        let listing = listing(&db, &host, 10_000).await;

        let err = db
            .reviews()
            .create(&review(&listing.id, &guest.id, 6, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::InvalidRating { rating: 6 })));
        assert_eq!(db.reviews().count().await.unwrap(), 0);

        let accepted = db
            .reviews()
            .create(&review(&listing.id, &guest.id, 5, Some("Spotless.")))
            .await
            .unwrap();
        assert_eq!(accepted.rating, 5);

        let details = db.reviews().get_details(&accepted.id).await.unwrap().unwrap();
        assert_eq!(details.guest_username, "guest");
        assert_eq!(details.listing_name, listing.name);
        assert_eq!(details.review.comment.as_deref(), Some("Spotless."));
    }

    #[tokio::test]
    async fn test_blank_comment_stored_as_absent() {
        let db = test_db().await;
        let host = user(&db, "host", UserRole::Host).await;
        let guest = user(&db, "guest", UserRole::Guest).await;
        let listing = listing(&db, &host, 10_000).await;

        let created = db
            .reviews()
            .create(&review(&listing.id, &guest.id, 3, Some("   ")))
            .await
            .unwrap();

        let stored = db.reviews().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.comment, None);
    }

    #[tokio::test]
    async fn test_rating_summary() {
        let db = test_db().await;
        let host = user(&db, "host", UserRole::Host).await;
        let guest = user(&db, "guest", UserRole::Guest).await;
        let listing = listing(&db, &host, 10_000).await;

        let empty = db.reviews().rating_summary(&listing.id).await.unwrap();
        assert_eq!(empty.review_count, 0);
        assert_eq!(empty.average_rating, None);

        for rating in [5, 4, 3] {
            db.reviews()
                .create(&review(&listing.id, &guest.id, rating, None))
                .await
                .unwrap();
        }

        let summary = db.reviews().rating_summary(&listing.id).await.unwrap();
        assert_eq!(summary.review_count, 3);
        assert_eq!(summary.average_rating, Some(4.0));
        assert_eq!(db.reviews().list_for_listing(&listing.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_reviews_cascade_with_listing() {
        let db = test_db().await;
        let host = user(&db, "host", UserRole::Host).await;
        let guest = user(&db, "guest", UserRole::Guest).await;
        let listing = listing(&db, &host, 10_000).await;
        let created = db
            .reviews()
            .create(&review(&listing.id, &guest.id, 4, None))
            .await
            .unwrap();

        db.listings().delete(&listing.id).await.unwrap();

        assert!(db.reviews().get_by_id(&created.id).await.unwrap().is_none());
        assert!(db.reviews().delete(&created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_review_for_missing_listing() {
        let db = test_db().await;
        let guest = user(&db, "guest", UserRole::Guest).await;

        let err = db
            .reviews()
            .create(&review("missing", &guest.id, 4, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
