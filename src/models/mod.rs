pub mod dealership;
pub mod review;

pub use dealership::Dealership;
pub use review::{NewReview, Review};
