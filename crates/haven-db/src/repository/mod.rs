//! # Repository Module
//!
//! Database repository implementations for Haven.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  haven-api operation                                                   │
//! │       │                                                                 │
//! │       │  db.bookings().create(&new_booking)                            │
//! │       ▼                                                                 │
//! │  BookingRepository                                                     │
//! │  ├── create(&self, new)           ← own transaction                    │
//! │  ├── create_in(&mut conn, new)    ← caller's transaction               │
//! │  ├── get_details(&self, id)                                            │
//! │  └── update_status(&self, id, next)                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database (FK + UNIQUE + CHECK)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Hosts, guests and admins
//! - [`ListingRepository`](listing::ListingRepository) - Listing CRUD with host joins
//! - [`BookingRepository`](booking::BookingRepository) - Priced bookings and status changes
//! - [`ReviewRepository`](review::ReviewRepository) - Ratings and rating summaries

pub mod booking;
pub mod listing;
pub mod review;
pub mod user;

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::DbResult;

/// Opens a transaction holding SQLite's write lock from the start.
///
/// Concurrent writers wait on the busy timeout at `BEGIN` and then see
/// committed data. A deferred read-then-write transaction would instead
/// fail with `SQLITE_BUSY` when another writer commits first.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Fixtures shared by the repository tests.
#[cfg(test)]
pub(crate) mod test_support {
    use haven_core::{Listing, Money, NewListing, NewUser, User, UserRole};

    use crate::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// File-backed database with a multi-connection pool, for tests that
    /// need real write contention. Keep the directory alive for the test.
    pub async fn file_db(dir: &tempfile::TempDir) -> Database {
        Database::new(DbConfig::new(dir.path().join("haven.db")).max_connections(8))
            .await
            .unwrap()
    }

    pub async fn user(db: &Database, username: &str, role: UserRole) -> User {
        db.users()
            .create(&NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                role,
            })
            .await
            .unwrap()
    }

    pub async fn listing(db: &Database, host: &User, price_cents: i64) -> Listing {
        db.listings()
            .create(&NewListing {
                host_id: host.id.clone(),
                name: "Garden cottage".to_string(),
                description: "Quiet cottage with a garden.".to_string(),
                location: "Sintra".to_string(),
                price_per_night: Money::from_cents(price_cents),
            })
            .await
            .unwrap()
    }
}
