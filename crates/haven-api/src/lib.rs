//! # haven-api: Presentation Layer for Haven
//!
//! Read/write projections of listings, bookings and reviews, ready to be
//! serialized as JSON by whatever transport embeds them.
//!
//! ## Operation Shape
//! ```text
//! caller JSON ──► *Input (serde) ──► haven-db repository ──► *Output (serde)
//!                                          │
//!                                          └── any failure ──► ApiError
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use haven_api::operations::bookings::{create_booking, BookingInput};
//!
//! let input: BookingInput = serde_json::from_str(body)?;
//! let booking = create_booking(&db, input).await?;
//! let json = serde_json::to_string(&booking)?;
//! ```

pub mod error;
pub mod operations;

pub use error::{ApiError, ApiResult, ErrorCode};
