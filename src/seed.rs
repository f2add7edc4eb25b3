//! Startup bootstrap: load the seed collections and reset both stores.
//!
//! `main` awaits [`bootstrap`] before binding the HTTP listener, so requests
//! never observe a half-loaded store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use crate::db::Database;
use crate::error::BootstrapError;
use crate::models::{Dealership, Review};
use crate::store::{DealershipStore, ReviewStore};

pub const REVIEWS_FILE: &str = "reviews.json";
pub const DEALERSHIPS_FILE: &str = "dealerships.json";

#[derive(Deserialize)]
struct ReviewsFile {
    reviews: Vec<Review>,
}

#[derive(Deserialize)]
struct DealershipsFile {
    dealerships: Vec<Dealership>,
}

/// Contents of the two seed files.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub reviews: Vec<Review>,
    pub dealerships: Vec<Dealership>,
}

impl SeedData {
    /// Read `reviews.json` and `dealerships.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, BootstrapError> {
        let reviews: ReviewsFile = read_json(dir.join(REVIEWS_FILE))?;
        let dealerships: DealershipsFile = read_json(dir.join(DEALERSHIPS_FILE))?;
        Ok(SeedData {
            reviews: reviews.reviews,
            dealerships: dealerships.dealerships,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: PathBuf) -> Result<T, BootstrapError> {
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(source) => return Err(BootstrapError::Io { path, source }),
    };
    serde_json::from_str(&text).map_err(|source| BootstrapError::Parse { path, source })
}

/// Replace the contents of both stores with `seed`. Seed reviews keep their literal ids.
pub async fn bootstrap<S>(store: &S, seed: SeedData) -> Result<(), BootstrapError>
where
    S: ReviewStore + DealershipStore,
{
    let review_count = seed.reviews.len();
    let dealership_count = seed.dealerships.len();

    store.replace_reviews(seed.reviews).await?;
    store.replace_dealerships(seed.dealerships).await?;

    info!(
        reviews = review_count,
        dealerships = dealership_count,
        "Stores initialized from seed data"
    );
    Ok(())
}

/// Open the SQLite store, create its schema and load the seed files into it.
pub async fn open_seeded_database(
    database_path: &str,
    seed_dir: &Path,
) -> anyhow::Result<Database> {
    let db = Database::new(database_path)
        .with_context(|| format!("failed to open database at {database_path}"))?;
    db.create_schema().await.context("failed to create schema")?;
    info!("Schema created successfully!");

    let seed = SeedData::load(seed_dir)?;
    bootstrap(&db, seed).await?;
    Ok(db)
}
