pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod models;
pub mod seed;
pub mod store;

pub use db::Database;
pub use error::{ApiError, BootstrapError, StoreError};
pub use memory::MemoryStore;
pub use store::{next_review_id, DealershipStore, ReviewStore};
