//! # Listing Operations
//!
//! Create, read, update and delete listings.
//!
//! `host` is accepted on input and never echoed; `host_username` is returned
//! instead. `listing_id` and timestamps are server-assigned and ignored if sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use haven_core::{ListingChanges, ListingDetails, Money, NewListing};
use haven_db::Database;

/// Listing creation input.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingInput {
    /// Owning host (user id). Write-only.
    pub host: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub price_per_night: Money,
}

/// Partial listing update. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingUpdateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_night: Option<Money>,
}

/// Listing as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingOutput {
    pub listing_id: String,
    pub host_username: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub price_per_night: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ListingDetails> for ListingOutput {
    fn from(d: ListingDetails) -> Self {
        ListingOutput {
            price_per_night: d.listing.price_per_night(),
            listing_id: d.listing.id,
            host_username: d.host_username,
            name: d.listing.name,
            description: d.listing.description,
            location: d.listing.location,
            created_at: d.listing.created_at,
            updated_at: d.listing.updated_at,
        }
    }
}

/// Creates a listing for `input.host`.
pub async fn create_listing(db: &Database, input: ListingInput) -> ApiResult<ListingOutput> {
    let listing = db
        .listings()
        .create(&NewListing {
            host_id: input.host,
            name: input.name,
            description: input.description,
            location: input.location,
            price_per_night: input.price_per_night,
        })
        .await?;

    info!(id = %listing.id, "Listing created");
    get_listing(db, &listing.id).await
}

/// Gets a listing by id.
pub async fn get_listing(db: &Database, id: &str) -> ApiResult<ListingOutput> {
    db.listings()
        .get_details(id)
        .await?
        .map(ListingOutput::from)
        .ok_or_else(|| ApiError::not_found("Listing", id))
}

/// Lists all listings, newest first.
pub async fn list_listings(db: &Database) -> ApiResult<Vec<ListingOutput>> {
    let listings = db.listings().list_details().await?;
    Ok(listings.into_iter().map(ListingOutput::from).collect())
}

/// Applies a partial update.
pub async fn update_listing(
    db: &Database,
    id: &str,
    input: ListingUpdateInput,
) -> ApiResult<ListingOutput> {
    let changes = ListingChanges {
        name: input.name,
        description: input.description,
        location: input.location,
        price_per_night: input.price_per_night,
    };

    db.listings().update(id, &changes).await?;
    get_listing(db, id).await
}

/// Deletes a listing and, by cascade, its bookings and reviews.
pub async fn delete_listing(db: &Database, id: &str) -> ApiResult<()> {
    db.listings().delete(id).await?;
    info!(id = %id, "Listing deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::operations::test_support::{host, test_db};
    use serde_json::json;

    #[tokio::test]
    async fn test_listing_json_shape() {
        let db = test_db().await;
        let host = host(&db).await;

        let input: ListingInput = serde_json::from_value(json!({
            "host": host.id,
            "name": "Canal house",
            "description": "Three floors by the canal.",
            "location": "Amsterdam",
            "price_per_night": "180.50",
            "listing_id": "client-chosen",
            "created_at": "1999-01-01T00:00:00Z"
        }))
        .unwrap();

        let output = create_listing(&db, input).await.unwrap();
        assert_ne!(output.listing_id, "client-chosen");

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["price_per_night"], "180.50");
        assert_eq!(json["host_username"], "host");
        assert!(json.get("host").is_none());
        assert!(json.get("host_id").is_none());
    }

    #[test]
    fn test_float_price_rejected() {
        let result = serde_json::from_value::<ListingInput>(json!({
            "host": "h",
            "name": "n",
            "description": "d",
            "location": "l",
            "price_per_night": 99.99
        }));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update_and_missing_listing() {
        let db = test_db().await;
        let host = host(&db).await;
        let created = create_listing(
            &db,
            ListingInput {
                host: host.id.clone(),
                name: "Loft".to_string(),
                description: "Open plan.".to_string(),
                location: "Berlin".to_string(),
                price_per_night: Money::from_cents(9_000),
            },
        )
        .await
        .unwrap();

        let updated = update_listing(
            &db,
            &created.listing_id,
            ListingUpdateInput {
                name: Some("Bright loft".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Bright loft");
        assert_eq!(updated.location, "Berlin");

        let err = get_listing(&db, "missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        delete_listing(&db, &created.listing_id).await.unwrap();
        assert!(list_listings(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_name_is_validation_error() {
        let db = test_db().await;
        let host = host(&db).await;

        let err = create_listing(
            &db,
            ListingInput {
                host: host.id,
                name: "  ".to_string(),
                description: "x".to_string(),
                location: "y".to_string(),
                price_per_night: Money::from_cents(100),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
