// src/models/review.rs
use serde::{Deserialize, Deserializer, Serialize};

/// A stored review, as returned by the API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub id: i64,               // Assigned by the store on insert
    pub name: String,          // Author name
    #[serde(deserialize_with = "dealer_ref")]
    pub dealership: i64,       // Identity of the reviewed dealership
    pub review: String,        // Body of the review
    pub purchase: bool,        // Whether the author bought a car there
    pub purchase_date: String,
    pub car_make: String,
    pub car_model: String,
    pub car_year: i32,
}

/// Request body of `POST /insert_review`. Any client-supplied `id` is ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewReview {
    pub name: String,
    #[serde(deserialize_with = "dealer_ref")]
    pub dealership: i64,
    pub review: String,
    pub purchase: bool,
    pub purchase_date: String,
    pub car_make: String,
    pub car_model: String,
    pub car_year: i32,
}

impl Review {
    pub fn from_new(id: i64, new: NewReview) -> Self {
        Review {
            id,
            name: new.name,
            dealership: new.dealership,
            review: new.review,
            purchase: new.purchase,
            purchase_date: new.purchase_date,
            car_make: new.car_make,
            car_model: new.car_model,
            car_year: new.car_year,
        }
    }
}

// Clients send the dealer reference either as a number or as the path-style string.
fn dealer_ref<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DealerRef {
        Number(i64),
        Text(String),
    }

    match DealerRef::deserialize(deserializer)? {
        DealerRef::Number(id) => Ok(id),
        DealerRef::Text(text) => text.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("invalid dealership reference: {text:?}"))
        }),
    }
}
