//! # Booking Pricing
//!
//! Decides whether a booking request is acceptable and derives its
//! authoritative total price.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quote_booking(price_per_night, start, end, supplied_total)             │
//! │                                                                         │
//! │  year outside 1..=9999 ?        ──► InvalidDateRange                    │
//! │  start >= end ?                 ──► InvalidDateRange                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  nights = end - start (days)                                           │
//! │  nights <= 0 ?                  ──► InvalidDateRange                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  expected = price_per_night × nights   (integer cents, checked)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  supplied_total != expected ?   ──► PriceMismatch { expected, provided }│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BookingQuote { nights, total_price: expected }                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Duplicate bookings are not detected here; the store's UNIQUE constraint
//! owns that invariant.

use chrono::{Datelike, NaiveDate};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// The accepted outcome of a booking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingQuote {
    /// Whole nights in `[start_date, end_date)`.
    pub nights: i64,
    /// Authoritative total: nightly rate × nights.
    pub total_price: Money,
}

/// Bookable years. Dates are stored as `YYYY-MM-DD` text and compared as
/// text, which only orders correctly for four-digit years.
const BOOKABLE_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Whole days between two dates (negative when `end_date` precedes `start_date`).
#[inline]
pub fn count_nights(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    (end_date - start_date).num_days()
}

/// Validates a booking request and computes its total.
///
/// ## Arguments
/// * `price_per_night` - The listing's nightly rate
/// * `start_date` / `end_date` - Requested stay, end exclusive
/// * `supplied_total` - Optional total asserted by the caller
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use haven_core::{quote_booking, CoreError, Money};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
///
/// let err = quote_booking(Money::from_cents(10_000), start, end, Some(Money::from_cents(25_000)))
///     .unwrap_err();
/// assert!(matches!(err, CoreError::PriceMismatch { .. }));
/// ```
pub fn quote_booking(
    price_per_night: Money,
    start_date: NaiveDate,
    end_date: NaiveDate,
    supplied_total: Option<Money>,
) -> CoreResult<BookingQuote> {
    let invalid_range = || CoreError::InvalidDateRange {
        start_date,
        end_date,
    };

    if !BOOKABLE_YEARS.contains(&start_date.year()) || !BOOKABLE_YEARS.contains(&end_date.year())
    {
        return Err(invalid_range());
    }

    if start_date >= end_date {
        return Err(invalid_range());
    }

    let nights = count_nights(start_date, end_date);
    if nights <= 0 {
        return Err(invalid_range());
    }

    let expected = price_per_night
        .checked_mul(nights)
        .ok_or(CoreError::PriceOverflow {
            price_per_night,
            nights,
        })?;

    if let Some(provided) = supplied_total {
        if provided != expected {
            return Err(CoreError::PriceMismatch { expected, provided });
        }
    }

    Ok(BookingQuote {
        nights,
        total_price: expected,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const HUNDRED: Money = Money::from_cents(10_000);

    #[test]
    fn test_three_night_stay_costs_three_nights() {
        let quote = quote_booking(HUNDRED, date(2024, 1, 1), date(2024, 1, 4), None).unwrap();
        assert_eq!(quote.nights, 3);
        assert_eq!(quote.total_price.to_string(), "300.00");
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let err = quote_booking(HUNDRED, date(2024, 1, 4), date(2024, 1, 1), None).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidDateRange {
                start_date: date(2024, 1, 4),
                end_date: date(2024, 1, 1),
            }
        );
    }

    #[test]
    fn test_same_day_rejected() {
        let err = quote_booking(HUNDRED, date(2024, 1, 1), date(2024, 1, 1), None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_five_digit_years_rejected() {
        let err = quote_booking(HUNDRED, date(9999, 12, 30), date(10000, 1, 2), None).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidDateRange {
                start_date: date(9999, 12, 30),
                end_date: date(10000, 1, 2),
            }
        );

        let quote = quote_booking(HUNDRED, date(9999, 12, 28), date(9999, 12, 31), None).unwrap();
        assert_eq!(quote.nights, 3);
    }

    #[test]
    fn test_wrong_supplied_total_reports_expected() {
        let err = quote_booking(
            HUNDRED,
            date(2024, 1, 1),
            date(2024, 1, 4),
            Some(Money::from_cents(25_000)),
        )
        .unwrap_err();

        assert_eq!(
            err,
            CoreError::PriceMismatch {
                expected: Money::from_cents(30_000),
                provided: Money::from_cents(25_000),
            }
        );
    }

    #[test]
    fn test_matching_supplied_total_accepted() {
        let supplied: Money = "300.00".parse().unwrap();
        let quote =
            quote_booking(HUNDRED, date(2024, 1, 1), date(2024, 1, 4), Some(supplied)).unwrap();
        assert_eq!(quote.total_price, supplied);
    }

    #[test]
    fn test_fractional_rates_stay_exact() {
        // 0.10 × 3 must be exactly 0.30
        let quote = quote_booking(
            Money::from_cents(10),
            date(2024, 1, 1),
            date(2024, 1, 4),
            Some("0.30".parse().unwrap()),
        )
        .unwrap();
        assert_eq!(quote.total_price.cents(), 30);
    }

    #[test]
    fn test_free_listing_is_bookable() {
        let quote = quote_booking(Money::zero(), date(2024, 1, 1), date(2024, 1, 2), None).unwrap();
        assert!(quote.total_price.is_zero());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let err = quote_booking(
            Money::from_cents(i64::MAX),
            date(2024, 1, 1),
            date(2024, 1, 3),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::PriceOverflow { nights: 2, .. }));
    }

    proptest! {
        #[test]
        fn prop_total_is_rate_times_nights(
            cents in 0i64..10_000_000,
            offset in 0i64..3_000,
            nights in 1i64..400,
        ) {
            let start = date(2020, 1, 1) + chrono::Duration::days(offset);
            let end = start + chrono::Duration::days(nights);

            let quote = quote_booking(Money::from_cents(cents), start, end, None).unwrap();

            prop_assert_eq!(quote.nights, nights);
            prop_assert_eq!(quote.total_price.cents(), cents * nights);

            // Asserting the computed total back is always accepted
            let again = quote_booking(Money::from_cents(cents), start, end, Some(quote.total_price));
            prop_assert_eq!(again, Ok(quote));
        }

        #[test]
        fn prop_non_increasing_ranges_rejected(
            offset in 0i64..3_000,
            back in 0i64..400,
        ) {
            let start = date(2020, 1, 1) + chrono::Duration::days(offset);
            let end = start - chrono::Duration::days(back);

            let result = quote_booking(HUNDRED, start, end, None);
            let is_invalid_range = matches!(result, Err(CoreError::InvalidDateRange { .. }));
            prop_assert!(is_invalid_range);
        }
    }
}
