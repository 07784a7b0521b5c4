//! # Seed Data Generator
//!
//! Populates the database with users, listings, bookings and reviews for
//! development.
//!
//! ## Usage
//! ```bash
//! # Defaults: 10 users, 50 listings, ≤5 bookings and ≤3 reviews per listing
//! cargo run -p haven-db --bin seed
//!
//! # Wipe listings first and generate a reproducible data set
//! cargo run -p haven-db --bin seed -- --clear --rng-seed 42
//!
//! # Specify database path
//! cargo run -p haven-db --bin seed -- --db ./data/haven.db
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use tracing_subscriber::EnvFilter;

use haven_db::{seed, Database, DbConfig, SeedOptions};

fn parse<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    value
        .ok_or_else(|| format!("{flag} needs a value"))?
        .parse()
        .map_err(|_| format!("invalid value for {flag}"))
}

fn print_help() {
    println!("Haven Seed Data Generator");
    println!();
    println!("Usage: seed [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>                 Database file path (default: $HAVEN_DATABASE_PATH or ./haven.db)");
    println!("  -u, --users <N>                 Total users to have (default: 10)");
    println!("  -l, --listings <N>              Listings to create (default: 50)");
    println!("      --bookings-per-listing <N>  Max bookings per listing (default: 5)");
    println!("      --reviews-per-listing <N>   Max reviews per listing (default: 3)");
    println!("      --clear                     Delete existing listings, bookings and reviews first");
    println!("      --rng-seed <N>              Seed for a reproducible data set");
    println!("  -h, --help                      Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config = DbConfig::from_env()?;
    let mut options = SeedOptions::default();
    let mut rng_seed: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--db" | "-d" => {
                config.database_path = parse::<String>("--db", value)?.into();
                i += 1;
            }
            "--users" | "-u" => {
                options.num_users = parse("--users", value)?;
                i += 1;
            }
            "--listings" | "-l" => {
                options.num_listings = parse("--listings", value)?;
                i += 1;
            }
            "--bookings-per-listing" => {
                options.max_bookings_per_listing = parse("--bookings-per-listing", value)?;
                i += 1;
            }
            "--reviews-per-listing" => {
                options.max_reviews_per_listing = parse("--reviews-per-listing", value)?;
                i += 1;
            }
            "--rng-seed" => {
                rng_seed = Some(parse("--rng-seed", value)?);
                i += 1;
            }
            "--clear" => options.clear = true,
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => return Err(format!("unknown argument: {other}").into()),
        }
        i += 1;
    }

    println!("🌱 Haven Seed Data Generator");
    println!("============================");
    println!("Database: {}", config.database_path.display());
    println!("Users:    {}", options.num_users);
    println!("Listings: {}", options.num_listings);
    println!();

    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let mut rng = match rng_seed {
        Some(value) => StdRng::seed_from_u64(value),
        None => StdRng::from_entropy(),
    };

    let start = std::time::Instant::now();
    let report = seed(&db, &options, &mut rng).await?;

    println!();
    println!("✓ Seed complete in {:?}", start.elapsed());
    println!("  Users created:    {}", report.users_created);
    println!("  Listings created: {}", report.listings_created);
    println!(
        "  Bookings created: {} ({} duplicates skipped)",
        report.bookings_created, report.bookings_skipped
    );
    println!("  Reviews created:  {}", report.reviews_created);

    db.close().await;
    Ok(())
}
