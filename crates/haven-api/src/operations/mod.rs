//! # Operations
//!
//! One module per resource. Every operation takes the shared [`Database`]
//! handle, deserialized input where relevant, and returns an output DTO or
//! an [`ApiError`](crate::ApiError).
//!
//! [`Database`]: haven_db::Database

pub mod bookings;
pub mod listings;
pub mod reviews;

#[cfg(test)]
pub(crate) mod test_support {
    use haven_core::{NewUser, User, UserRole};
    use haven_db::{Database, DbConfig};

    use super::listings::{create_listing, ListingInput, ListingOutput};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn user(db: &Database, username: &str, role: UserRole) -> User {
        db.users()
            .create(&NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                first_name: String::new(),
                last_name: String::new(),
                role,
            })
            .await
            .unwrap()
    }

    pub async fn host(db: &Database) -> User {
        user(db, "host", UserRole::Host).await
    }

    pub async fn guest(db: &Database) -> User {
        user(db, "guest", UserRole::Guest).await
    }

    pub async fn listing(db: &Database, host: &User, price: &str) -> ListingOutput {
        create_listing(
            db,
            ListingInput {
                host: host.id.clone(),
                name: "Seaside studio".to_string(),
                description: "Steps from the sand.".to_string(),
                location: "Cascais".to_string(),
                price_per_night: price.parse().unwrap(),
            },
        )
        .await
        .unwrap()
    }
}
