//! In-memory record stores for tests and setups that do not need persistence.

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::models::{Dealership, NewReview, Review};
use crate::store::{
    dealer_not_found, ensure_unique_ids, next_review_id, parse_id, DealershipStore, ReviewStore,
};

/// Vec-backed store. Records are kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reviews: RwLock<Vec<Review>>,
    dealerships: RwLock<Vec<Dealership>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReviewStore for MemoryStore {
    async fn insert_review(&self, review: NewReview) -> Result<Review, StoreError> {
        let mut reviews = self.reviews.write().await;
        let review = Review::from_new(next_review_id(reviews.iter().map(|r| r.id))?, review);
        reviews.push(review.clone());
        debug!("Stored review {} in memory", review.id);
        Ok(review)
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, StoreError> {
        Ok(self.reviews.read().await.clone())
    }

    async fn list_reviews_by_dealer(&self, dealer_id: &str) -> Result<Vec<Review>, StoreError> {
        let Some(dealer_id) = parse_id(dealer_id) else {
            return Ok(Vec::new());
        };
        let reviews = self.reviews.read().await;
        Ok(reviews
            .iter()
            .filter(|r| r.dealership == dealer_id)
            .cloned()
            .collect())
    }

    async fn next_review_id(&self) -> Result<i64, StoreError> {
        let reviews = self.reviews.read().await;
        next_review_id(reviews.iter().map(|r| r.id))
    }

    async fn replace_reviews(&self, reviews: Vec<Review>) -> Result<(), StoreError> {
        ensure_unique_ids("review", reviews.iter().map(|r| r.id))?;
        *self.reviews.write().await = reviews;
        Ok(())
    }
}

impl DealershipStore for MemoryStore {
    async fn list_dealerships(&self) -> Result<Vec<Dealership>, StoreError> {
        Ok(self.dealerships.read().await.clone())
    }

    async fn list_dealerships_by_state(
        &self,
        state: &str,
    ) -> Result<Vec<Dealership>, StoreError> {
        let dealerships = self.dealerships.read().await;
        Ok(dealerships
            .iter()
            .filter(|d| d.state == state)
            .cloned()
            .collect())
    }

    async fn get_dealership(&self, id: &str) -> Result<Dealership, StoreError> {
        let key = parse_id(id).ok_or_else(|| dealer_not_found(id))?;
        let dealerships = self.dealerships.read().await;
        dealerships
            .iter()
            .find(|d| d.id == key)
            .cloned()
            .ok_or_else(|| dealer_not_found(id))
    }

    async fn replace_dealerships(&self, dealerships: Vec<Dealership>) -> Result<(), StoreError> {
        ensure_unique_ids("dealership", dealerships.iter().map(|d| d.id))?;
        *self.dealerships.write().await = dealerships;
        Ok(())
    }
}
