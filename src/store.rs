//! Record store abstractions shared by the SQLite and in-memory backends.
//!
//! Handlers only see these traits; the concrete store is built once in `main`
//! and handed to actix-web as `web::Data`.

use std::collections::HashSet;

use crate::error::StoreError;
use crate::models::{Dealership, NewReview, Review};

/// Next review id for a snapshot of existing ids: `max + 1`, or `1` when empty.
pub fn next_review_id<I>(ids: I) -> Result<i64, StoreError>
where
    I: IntoIterator<Item = i64>,
{
    match ids.into_iter().max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(StoreError::IdExhausted { max }),
    }
}

/// Fails with `StoreError::DuplicateId` on the first repeated id.
pub(crate) fn ensure_unique_ids<I>(collection: &'static str, ids: I) -> Result<(), StoreError>
where
    I: IntoIterator<Item = i64>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::DuplicateId { collection, id });
        }
    }
    Ok(())
}

/// Dealer identities arrive as path segments; anything non-numeric names no record.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[allow(async_fn_in_trait)]
pub trait ReviewStore {
    /// Assign the next id and store the review in one critical section.
    async fn insert_review(&self, review: NewReview) -> Result<Review, StoreError>;

    async fn list_reviews(&self) -> Result<Vec<Review>, StoreError>;

    /// Reviews whose dealership reference equals `dealer_id`.
    async fn list_reviews_by_dealer(&self, dealer_id: &str) -> Result<Vec<Review>, StoreError>;

    async fn next_review_id(&self) -> Result<i64, StoreError>;

    /// Clear the store, then insert `reviews` verbatim, ids included.
    async fn replace_reviews(&self, reviews: Vec<Review>) -> Result<(), StoreError>;
}

#[allow(async_fn_in_trait)]
pub trait DealershipStore {
    async fn list_dealerships(&self) -> Result<Vec<Dealership>, StoreError>;

    async fn list_dealerships_by_state(&self, state: &str)
        -> Result<Vec<Dealership>, StoreError>;

    /// Fails with `StoreError::NotFound` when no dealer has this identity.
    async fn get_dealership(&self, id: &str) -> Result<Dealership, StoreError>;

    async fn replace_dealerships(&self, dealerships: Vec<Dealership>) -> Result<(), StoreError>;
}

pub(crate) fn dealer_not_found(id: &str) -> StoreError {
    StoreError::NotFound {
        collection: "dealership",
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_of_empty_snapshot_is_one() {
        assert_eq!(next_review_id(Vec::<i64>::new()).unwrap(), 1);
    }

    #[test]
    fn test_next_id_follows_maximum() {
        assert_eq!(next_review_id([3_i64, 41, 7]).unwrap(), 42);
        assert_eq!(next_review_id([1_i64]).unwrap(), 2);
    }

    #[test]
    fn test_next_id_does_not_overflow() {
        assert!(matches!(
            next_review_id([5_i64, i64::MAX]),
            Err(StoreError::IdExhausted { max: i64::MAX })
        ));
    }

    #[test]
    fn test_ensure_unique_ids() {
        assert!(ensure_unique_ids("review", [1_i64, 2, 3]).is_ok());
        assert!(matches!(
            ensure_unique_ids("review", [1_i64, 3, 1]),
            Err(StoreError::DuplicateId { id: 1, .. })
        ));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("15"), Some(15));
        assert_eq!(parse_id(" 7 "), Some(7));
        assert_eq!(parse_id("nonexistent"), None);
        assert_eq!(parse_id(""), None);
    }
}
