//! # Seed Data Generator
//!
//! Populates the database with users, listings, bookings and reviews for
//! development and testing.
//!
//! ## Generation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    seed() - one transaction                             │
//! │                                                                         │
//! │  (clear) DELETE reviews, bookings, listings                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Users      top up to num_users, random host/guest                     │
//! │       │     ensure at least one host and one guest                     │
//! │       ▼                                                                 │
//! │  Listings   num_listings, random host, price 50.00..=500.00            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Bookings   0..=max per listing, priced by quote_booking,              │
//! │       │     status moved through the transition rules                  │
//! │       ▼                                                                 │
//! │  Reviews    0..=max per listing, rating 1..=5, comment 70%             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT (any error rolls back everything)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Randomness comes only from the `Rng` passed in, so a seeded `StdRng` and a
//! fixed reference date reproduce the same data set.

use chrono::{Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::SqliteConnection;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::booking::BookingRepository;
use crate::repository::listing::ListingRepository;
use crate::repository::review::ReviewRepository;
use crate::repository::user::UserRepository;
use haven_core::{BookingStatus, Money, NewBooking, NewListing, NewReview, NewUser, User, UserRole};

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "David", "Elena", "Felix", "Grace", "Hugo", "Ines", "Jonas",
    "Kira", "Luis", "Marta", "Nina", "Oscar", "Paula", "Rafael", "Sofia", "Tomas", "Vera",
];

const LAST_NAMES: &[&str] = &[
    "Almeida", "Becker", "Costa", "Dubois", "Evans", "Ferreira", "Garcia", "Hansen",
    "Ito", "Jensen", "Kowalski", "Lopez", "Moreau", "Novak", "Olsen", "Pereira",
];

const CITIES: &[&str] = &[
    "Lisbon", "Porto", "Madrid", "Seville", "Barcelona", "Marseille", "Lyon", "Berlin",
    "Hamburg", "Amsterdam", "Copenhagen", "Prague", "Vienna", "Krakow", "Dublin", "Edinburgh",
];

const ADJECTIVES: &[&str] = &[
    "Sunny", "Cozy", "Spacious", "Quiet", "Modern", "Rustic", "Bright", "Charming",
    "Elegant", "Airy", "Historic", "Secluded",
];

const PLACES: &[&str] = &[
    "loft", "apartment", "cottage", "studio", "villa", "townhouse", "cabin", "flat",
    "penthouse", "farmhouse",
];

const FEATURES: &[&str] = &[
    "near the old town",
    "with a river view",
    "by the beach",
    "with a private garden",
    "close to the station",
    "with a rooftop terrace",
    "in a leafy street",
    "above a bakery",
];

const SENTENCES: &[&str] = &[
    "The kitchen is fully equipped.",
    "Fresh linen and towels are provided.",
    "Public transport is a short walk away.",
    "The bedroom faces a quiet courtyard.",
    "Fast wifi and a desk make it easy to work.",
    "Cafes and restaurants line the street.",
    "Parking is available nearby.",
    "Check-in is self-service with a key box.",
    "The living room gets the afternoon sun.",
    "Pets are welcome on request.",
];

const REVIEW_SENTENCES: &[&str] = &[
    "Great location and a very responsive host.",
    "Exactly as described.",
    "Clean, comfortable and quiet.",
    "Would happily stay again.",
    "The bed could be better but the view made up for it.",
    "A little noisy at night.",
    "Perfect for a weekend away.",
];

/// Parameters for a seeding run.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// Target total number of users (existing users count towards it).
    pub num_users: usize,
    /// Listings to create.
    pub num_listings: usize,
    /// Upper bound of bookings per listing (inclusive).
    pub max_bookings_per_listing: usize,
    /// Upper bound of reviews per listing (inclusive).
    pub max_reviews_per_listing: usize,
    /// Delete existing reviews, bookings and listings first.
    pub clear: bool,
    /// Booking windows are drawn within ±365 days of this date.
    pub reference_date: NaiveDate,
}

impl Default for SeedOptions {
    fn default() -> Self {
        SeedOptions {
            num_users: 10,
            num_listings: 50,
            max_bookings_per_listing: 5,
            max_reviews_per_listing: 3,
            clear: false,
            reference_date: Utc::now().date_naive(),
        }
    }
}

/// What a seeding run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users_created: usize,
    pub listings_created: usize,
    pub bookings_created: usize,
    /// Draws that repeated an existing (listing, guest, dates) tuple.
    pub bookings_skipped: usize,
    pub reviews_created: usize,
}

/// Seeds the database in a single transaction.
///
/// ## Example
/// ```rust,ignore
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let report = seed(&db, &SeedOptions::default(), &mut rng).await?;
/// ```
pub async fn seed<R: Rng + ?Sized>(
    db: &Database,
    options: &SeedOptions,
    rng: &mut R,
) -> DbResult<SeedReport> {
    let mut tx = db.begin().await?;
    let mut report = SeedReport::default();

    if options.clear {
        warn!("Clearing existing reviews, bookings and listings");
        clear(&mut *tx).await?;
    }

    info!(num_users = options.num_users, "Seeding users");
    report.users_created += top_up_users(&mut *tx, options.num_users, rng).await?;

    let extra = (options.num_users / 5).max(1);
    let hosts = ensure_role(&mut *tx, UserRole::Host, extra, rng, &mut report).await?;
    let guests = ensure_role(&mut *tx, UserRole::Guest, extra, rng, &mut report).await?;

    info!(num_listings = options.num_listings, "Seeding listings");
    let mut listings = Vec::with_capacity(options.num_listings);
    for _ in 0..options.num_listings {
        let host = pick(&hosts, rng)?;
        let listing = ListingRepository::create_in(&mut *tx, &random_listing(host, rng)).await?;
        debug!(name = %listing.name, host = %host.username, "Created listing");
        listings.push(listing);
    }
    report.listings_created = listings.len();

    info!("Seeding bookings");
    let mut booked = HashSet::new();
    for listing in &listings {
        for _ in 0..rng.gen_range(0..=options.max_bookings_per_listing) {
            let guest = pick(&guests, rng)?;
            let start_date =
                options.reference_date + Duration::days(rng.gen_range(-365..=365));
            let end_date = start_date + Duration::days(rng.gen_range(1..=14));

            if !booked.insert((listing.id.clone(), guest.id.clone(), start_date, end_date)) {
                report.bookings_skipped += 1;
                continue;
            }

            let booking = BookingRepository::create_in(
                &mut *tx,
                &NewBooking {
                    listing_id: listing.id.clone(),
                    guest_id: guest.id.clone(),
                    start_date,
                    end_date,
                    total_price: None,
                },
            )
            .await?;

            let status = BookingStatus::ALL.choose(rng).copied().unwrap_or_default();
            if status != BookingStatus::Pending {
                BookingRepository::update_status_in(&mut *tx, &booking.id, status).await?;
            }
            report.bookings_created += 1;
        }
    }

    info!("Seeding reviews");
    for listing in &listings {
        for _ in 0..rng.gen_range(0..=options.max_reviews_per_listing) {
            let guest = pick(&guests, rng)?;
            let comment = if rng.gen_bool(0.7) {
                Some(paragraph(REVIEW_SENTENCES, rng.gen_range(1..=3), rng))
            } else {
                None
            };

            ReviewRepository::create_in(
                &mut *tx,
                &NewReview {
                    listing_id: listing.id.clone(),
                    guest_id: guest.id.clone(),
                    rating: rng.gen_range(1..=5),
                    comment,
                },
            )
            .await?;
            report.reviews_created += 1;
        }
    }

    tx.commit().await?;

    info!(
        users = report.users_created,
        listings = report.listings_created,
        bookings = report.bookings_created,
        skipped = report.bookings_skipped,
        reviews = report.reviews_created,
        "Seeding complete"
    );
    Ok(report)
}

async fn clear(conn: &mut SqliteConnection) -> DbResult<()> {
    for table in ["reviews", "bookings", "listings"] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn top_up_users<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    target: usize,
    rng: &mut R,
) -> DbResult<usize> {
    let existing = usize::try_from(UserRepository::count_in(&mut *conn).await?).unwrap_or(0);
    if existing >= target {
        info!(existing, "Enough users already exist");
        return Ok(0);
    }

    let missing = target - existing;
    for _ in 0..missing {
        let role = if rng.gen_bool(0.5) {
            UserRole::Host
        } else {
            UserRole::Guest
        };
        let user = UserRepository::create_in(&mut *conn, &random_user(role, rng)).await?;
        debug!(username = %user.username, role = %role, "Created user");
    }
    Ok(missing)
}

/// Returns every user holding `role`, creating `count` of them first if none exist.
async fn ensure_role<R: Rng + ?Sized>(
    conn: &mut SqliteConnection,
    role: UserRole,
    count: usize,
    rng: &mut R,
    report: &mut SeedReport,
) -> DbResult<Vec<User>> {
    let users = UserRepository::list_by_role_in(&mut *conn, role).await?;
    if !users.is_empty() {
        return Ok(users);
    }

    warn!(role = %role, count, "No users with role, creating some");
    for _ in 0..count {
        UserRepository::create_in(&mut *conn, &random_user(role, rng)).await?;
    }
    report.users_created += count;

    UserRepository::list_by_role_in(&mut *conn, role).await
}

fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> DbResult<&'a T> {
    items
        .choose(rng)
        .ok_or_else(|| DbError::Internal("seed pool is empty".to_string()))
}

fn word<R: Rng + ?Sized>(words: &[&'static str], rng: &mut R) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}

fn paragraph<R: Rng + ?Sized>(sentences: &[&'static str], count: usize, rng: &mut R) -> String {
    (0..count)
        .map(|_| word(sentences, rng))
        .collect::<Vec<_>>()
        .join(" ")
}

fn random_user<R: Rng + ?Sized>(role: UserRole, rng: &mut R) -> NewUser {
    let first_name = word(FIRST_NAMES, rng);
    let last_name = word(LAST_NAMES, rng);
    let username = format!(
        "{}.{}_{}_{:08x}",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        role,
        rng.gen::<u32>()
    );

    NewUser {
        email: format!("{username}@example.com"),
        username,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        role,
    }
}

fn random_listing<R: Rng + ?Sized>(host: &User, rng: &mut R) -> NewListing {
    let name = format!(
        "{} {} {}",
        word(ADJECTIVES, rng),
        word(PLACES, rng),
        word(FEATURES, rng)
    );
    let sentences = rng.gen_range(3..=8);

    NewListing {
        host_id: host.id.clone(),
        name,
        description: paragraph(SENTENCES, sentences, rng),
        location: word(CITIES, rng).to_string(),
        price_per_night: Money::from_major_minor(rng.gen_range(50..=500), 0),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn options() -> SeedOptions {
        SeedOptions {
            num_users: 8,
            num_listings: 12,
            reference_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            ..Default::default()
        }
    }

    async fn counts(db: &Database) -> (i64, i64, i64, i64) {
        (
            db.users().count().await.unwrap(),
            db.listings().count().await.unwrap(),
            db.bookings().count().await.unwrap(),
            db.reviews().count().await.unwrap(),
        )
    }

    #[tokio::test]
    async fn test_same_seed_same_data_set() {
        let first = test_db().await;
        let second = test_db().await;

        let a = seed(&first, &options(), &mut StdRng::seed_from_u64(7)).await.unwrap();
        let b = seed(&second, &options(), &mut StdRng::seed_from_u64(7)).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(counts(&first).await, counts(&second).await);
        assert_eq!(a.listings_created, 12);
        assert_eq!(counts(&first).await.2, a.bookings_created as i64);
    }

    #[tokio::test]
    async fn test_seeded_bookings_satisfy_pricing() {
        let db = test_db().await;
        seed(&db, &options(), &mut StdRng::seed_from_u64(11)).await.unwrap();

        let rows: Vec<(i64, i64, NaiveDate, NaiveDate)> = sqlx::query_as(
            r#"
            SELECT b.total_price_cents, l.price_per_night_cents, b.start_date, b.end_date
            FROM bookings b INNER JOIN listings l ON l.id = b.listing_id
            "#,
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        for (total, price, start, end) in rows {
            let nights = (end - start).num_days();
            assert!((1..=14).contains(&nights));
            assert_eq!(total, price * nights);
        }

        let out_of_range: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM listings WHERE price_per_night_cents NOT BETWEEN 5000 AND 50000",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(out_of_range, 0);
    }

    #[tokio::test]
    async fn test_no_users_still_gets_host_and_guest() {
        let db = test_db().await;
        let opts = SeedOptions {
            num_users: 0,
            num_listings: 2,
            ..options()
        };

        let report = seed(&db, &opts, &mut StdRng::seed_from_u64(3)).await.unwrap();

        assert_eq!(report.users_created, 2);
        assert_eq!(db.users().list_by_role(UserRole::Host).await.unwrap().len(), 1);
        assert_eq!(db.users().list_by_role(UserRole::Guest).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_replaces_listings_and_keeps_users() {
        let db = test_db().await;
        seed(&db, &options(), &mut StdRng::seed_from_u64(1)).await.unwrap();
        let users_before = db.users().count().await.unwrap();

        let opts = SeedOptions {
            clear: true,
            num_listings: 3,
            ..options()
        };
        let report = seed(&db, &opts, &mut StdRng::seed_from_u64(2)).await.unwrap();

        assert_eq!(report.users_created, 0);
        assert_eq!(db.users().count().await.unwrap(), users_before);
        assert_eq!(db.listings().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_failure_rolls_back_everything() {
        let db = test_db().await;
        sqlx::query(
            r#"
            CREATE TRIGGER reject_reviews BEFORE INSERT ON reviews
            BEGIN
                SELECT RAISE(ABORT, 'reviews disabled');
            END
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let opts = SeedOptions {
            num_listings: 30,
            ..options()
        };
        let result = seed(&db, &opts, &mut StdRng::seed_from_u64(5)).await;

        assert!(result.is_err());
        assert_eq!(counts(&db).await, (0, 0, 0, 0));
    }
}
