//! # haven-core: Pure Business Logic for Haven
//!
//! This crate is the **heart** of Haven. It holds the domain model and every
//! business rule as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Haven Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  haven-api (Presentation)                       │   │
//! │  │    ListingInput ──► create_booking ──► BookingOutput            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ haven-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │  Listing  │  │   Money   │  │  nights   │  │  rating   │  │   │
//! │  │   │  Booking  │  │  "300.00" │  │  quote    │  │  fields   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    haven-db (Entity Store)                      │   │
//! │  │          SQLite tables, constraints, repositories, seeding      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Listing, Booking, Review, BookingStatus)
//! - [`money`] - Fixed-point money in integer cents (no floating point!)
//! - [`pricing`] - Booking validator: date range + nightly-rate total
//! - [`error`] - Domain error types
//! - [`validation`] - Field and rating validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use haven_core::money::Money;
//! use haven_core::pricing::quote_booking;
//!
//! let nightly = Money::from_major_minor(100, 0);
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
//!
//! let quote = quote_booking(nightly, start, end, None).unwrap();
//! assert_eq!(quote.nights, 3);
//! assert_eq!(quote.total_price.to_string(), "300.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{quote_booking, BookingQuote};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a listing name.
pub const MAX_LISTING_NAME_LENGTH: usize = 255;

/// Maximum length of a listing location.
pub const MAX_LOCATION_LENGTH: usize = 255;

/// Maximum length of a username.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Lowest accepted review rating.
pub const MIN_RATING: i64 = 1;

/// Highest accepted review rating.
pub const MAX_RATING: i64 = 5;
