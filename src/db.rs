use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::StoreError;
use crate::models::{Dealership, NewReview, Review};
use crate::store::{
    dealer_not_found, ensure_unique_ids, next_review_id, parse_id, DealershipStore, ReviewStore,
};

const REVIEW_COLUMNS: &str =
    "id, name, dealership, review, purchase, purchase_date, car_make, car_model, car_year";

// Define a struct to represent a database connection
#[derive(Debug)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    // Create a new database connection
    pub fn new(db_path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        info!("Database connection established at: {}", db_path);
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    // Create the database schema
    pub async fn create_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;

        // 1. Reviews table
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                dealership INTEGER NOT NULL,
                review TEXT NOT NULL,
                purchase INTEGER NOT NULL,
                purchase_date TEXT NOT NULL,
                car_make TEXT NOT NULL,
                car_model TEXT NOT NULL,
                car_year INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS reviews_by_dealership ON reviews (dealership);",
        )
        .map_err(|e| {
            error!("Failed creating reviews table: {}", e);
            e
        })?;

        // 2. Dealerships table, descriptive fields kept as a JSON object
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS dealerships (
                id INTEGER PRIMARY KEY,
                state TEXT NOT NULL,
                details TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS dealerships_by_state ON dealerships (state);",
        )
        .map_err(|e| {
            error!("Failed creating dealerships table: {}", e);
            e
        })?;
        Ok(())
    }

    fn fetch_reviews(
        conn: &Connection,
        filter: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Review>, StoreError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews {filter} ORDER BY id"
        ))?;
        let reviews = stmt
            .query_map(params, review_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reviews)
    }

    fn fetch_dealerships(
        conn: &Connection,
        filter: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Dealership>, StoreError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, state, details FROM dealerships {filter} ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params, dealership_parts)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(dealership_from_parts).collect()
    }

    fn max_review_id(conn: &Connection) -> Result<Option<i64>, StoreError> {
        let max = conn.query_row("SELECT MAX(id) FROM reviews", [], |row| row.get(0))?;
        Ok(max)
    }
}

fn review_from_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(0)?,
        name: row.get(1)?,
        dealership: row.get(2)?,
        review: row.get(3)?,
        purchase: row.get(4)?,
        purchase_date: row.get(5)?,
        car_make: row.get(6)?,
        car_model: row.get(7)?,
        car_year: row.get(8)?,
    })
}

fn insert_review_row(conn: &Connection, review: &Review) -> Result<(), StoreError> {
    conn.execute(
        &format!("INSERT INTO reviews ({REVIEW_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
        params![
            review.id,
            &review.name,
            review.dealership,
            &review.review,
            review.purchase,
            &review.purchase_date,
            &review.car_make,
            &review.car_model,
            review.car_year
        ],
    )?;
    Ok(())
}

fn dealership_parts(row: &Row<'_>) -> rusqlite::Result<(i64, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn dealership_from_parts(
    (id, state, details): (i64, String, String),
) -> Result<Dealership, StoreError> {
    Ok(Dealership {
        id,
        state,
        details: serde_json::from_str(&details)?,
    })
}

impl ReviewStore for Database {
    async fn insert_review(&self, review: NewReview) -> Result<Review, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        // Id assignment and insert share the lock and the transaction
        let id = next_review_id(Self::max_review_id(&tx)?)?;
        let review = Review::from_new(id, review);
        insert_review_row(&tx, &review)?;

        tx.commit()?;
        debug!("[DB] Inserted review {} for dealership {}", review.id, review.dealership);
        Ok(review)
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, StoreError> {
        let conn = self.conn.lock().await;
        let reviews = Self::fetch_reviews(&conn, "", [])?;
        debug!("[DB] Fetched {} reviews", reviews.len());
        Ok(reviews)
    }

    async fn list_reviews_by_dealer(&self, dealer_id: &str) -> Result<Vec<Review>, StoreError> {
        let Some(dealer_id) = parse_id(dealer_id) else {
            return Ok(Vec::new());
        };
        let conn = self.conn.lock().await;
        let reviews = Self::fetch_reviews(&conn, "WHERE dealership = ?1", [dealer_id])?;
        debug!("[DB] Fetched {} reviews for dealership {}", reviews.len(), dealer_id);
        Ok(reviews)
    }

    async fn next_review_id(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock().await;
        next_review_id(Self::max_review_id(&conn)?)
    }

    async fn replace_reviews(&self, reviews: Vec<Review>) -> Result<(), StoreError> {
        ensure_unique_ids("review", reviews.iter().map(|r| r.id))?;
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM reviews", [])?;
        for review in &reviews {
            insert_review_row(&tx, review)?;
        }

        tx.commit()?;
        info!("[DB] Review store reset with {} records", reviews.len());
        Ok(())
    }
}

impl DealershipStore for Database {
    async fn list_dealerships(&self) -> Result<Vec<Dealership>, StoreError> {
        let conn = self.conn.lock().await;
        Self::fetch_dealerships(&conn, "", [])
    }

    async fn list_dealerships_by_state(
        &self,
        state: &str,
    ) -> Result<Vec<Dealership>, StoreError> {
        let conn = self.conn.lock().await;
        let dealerships = Self::fetch_dealerships(&conn, "WHERE state = ?1", [state])?;
        debug!("[DB] Fetched {} dealerships in {}", dealerships.len(), state);
        Ok(dealerships)
    }

    async fn get_dealership(&self, id: &str) -> Result<Dealership, StoreError> {
        let key = parse_id(id).ok_or_else(|| dealer_not_found(id))?;
        let conn = self.conn.lock().await;
        let parts = conn
            .query_row(
                "SELECT id, state, details FROM dealerships WHERE id = ?1",
                [key],
                dealership_parts,
            )
            .optional()?;

        match parts {
            Some(parts) => dealership_from_parts(parts),
            None => Err(dealer_not_found(id)),
        }
    }

    async fn replace_dealerships(&self, dealerships: Vec<Dealership>) -> Result<(), StoreError> {
        ensure_unique_ids("dealership", dealerships.iter().map(|d| d.id))?;
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM dealerships", [])?;
        for dealership in &dealerships {
            tx.execute(
                "INSERT INTO dealerships (id, state, details) VALUES (?1, ?2, ?3)",
                params![
                    dealership.id,
                    &dealership.state,
                    serde_json::to_string(&dealership.details)?
                ],
            )?;
        }

        tx.commit()?;
        info!("[DB] Dealership store reset with {} records", dealerships.len());
        Ok(())
    }
}
