//! # haven-db: Entity Store for Haven
//!
//! This crate provides database access for Haven.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Haven Data Flow                                  │
//! │                                                                         │
//! │  haven-api operation (create_booking)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     haven-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ListingRepo   │    │ 001_initial  │  │   │
//! │  │   │ Transactions  │    │ BookingRepo   │    │  _schema.sql │  │   │
//! │  │   │               │    │ ReviewRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (HAVEN_DATABASE_PATH, default ./haven.db)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Pool and file settings
//! - [`pool`] - Connection pool creation and repository access
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (user, listing, booking, review)
//! - [`seed`] - Development data generator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use haven_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/haven.db")).await?;
//!
//! let listing = db.listings().create(&new_listing).await?;
//! let booking = db.bookings().create(&new_booking).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, DbConfig};
pub use error::{DbError, DbResult};
pub use pool::Database;
pub use seed::{seed, SeedOptions, SeedReport};

// Repository re-exports for convenience
pub use repository::booking::BookingRepository;
pub use repository::listing::ListingRepository;
pub use repository::review::ReviewRepository;
pub use repository::user::UserRepository;
