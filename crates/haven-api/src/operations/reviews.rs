//! # Review Operations
//!
//! Reviews are created and deleted, never edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use haven_core::{NewReview, RatingSummary, ReviewDetails};
use haven_db::Database;

/// Review submission.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    /// Listing id. Write-only.
    pub listing: String,
    /// Guest user id. Write-only.
    pub guest: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Review as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOutput {
    pub review_id: String,
    pub listing_name: String,
    pub guest_username: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewDetails> for ReviewOutput {
    fn from(d: ReviewDetails) -> Self {
        ReviewOutput {
            review_id: d.review.id,
            listing_name: d.listing_name,
            guest_username: d.guest_username,
            rating: d.review.rating,
            comment: d.review.comment,
            created_at: d.review.created_at,
        }
    }
}

/// Validates and stores a review.
///
/// ## Errors
/// * `INVALID_RATING` - rating outside 1..=5
/// * `CONSTRAINT_VIOLATION` - listing or guest missing
pub async fn create_review(db: &Database, input: ReviewInput) -> ApiResult<ReviewOutput> {
    let review = db
        .reviews()
        .create(&NewReview {
            listing_id: input.listing,
            guest_id: input.guest,
            rating: input.rating,
            comment: input.comment,
        })
        .await?;

    get_review(db, &review.id).await
}

/// Gets a review by id.
pub async fn get_review(db: &Database, id: &str) -> ApiResult<ReviewOutput> {
    db.reviews()
        .get_details(id)
        .await?
        .map(ReviewOutput::from)
        .ok_or_else(|| ApiError::not_found("Review", id))
}

/// Lists reviews of a listing, newest first.
pub async fn list_reviews_for_listing(
    db: &Database,
    listing_id: &str,
) -> ApiResult<Vec<ReviewOutput>> {
    let reviews = db.reviews().list_for_listing(listing_id).await?;
    Ok(reviews.into_iter().map(ReviewOutput::from).collect())
}

/// Review count and mean rating of a listing.
pub async fn listing_rating(db: &Database, listing_id: &str) -> ApiResult<RatingSummary> {
    if db.listings().get_by_id(listing_id).await?.is_none() {
        return Err(ApiError::not_found("Listing", listing_id));
    }
    Ok(db.reviews().rating_summary(listing_id).await?)
}

/// Deletes a review.
pub async fn delete_review(db: &Database, id: &str) -> ApiResult<()> {
    db.reviews().delete(id).await?;
    Ok(())
}
