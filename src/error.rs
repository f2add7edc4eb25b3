use std::path::PathBuf;

use actix_web::{
    error::JsonPayloadError,
    http::{header::ContentType, StatusCode},
    HttpResponse, ResponseError,
};
use serde_json::json;
use thiserror::Error;

/// Failures raised by the record stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("malformed stored document: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{collection} {id} not found")]
    NotFound { collection: &'static str, id: String },

    #[error("duplicate {collection} id {id}")]
    DuplicateId { collection: &'static str, id: i64 },

    #[error("review id space exhausted after {max}")]
    IdExhausted { max: i64 },
}

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to load seed data into the store: {0}")]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
#[error("invalid value for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub reason: String,
}

/// Errors surfaced by the HTTP handlers, one variant per wire shape.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Error fetching documents")]
    FetchReviews(#[source] StoreError),

    #[error("Error inserting review")]
    InsertReview(#[source] StoreError),

    #[error("{0}")]
    Dealers(#[source] StoreError),

    #[error("Dealer not found")]
    DealerNotFound,

    #[error("Error inserting review")]
    InvalidBody(#[source] JsonPayloadError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::FetchReviews(_) | ApiError::InsertReview(_) | ApiError::Dealers(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::DealerNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            // Dealer routes answer with the bare error text.
            ApiError::Dealers(_) | ApiError::DealerNotFound => response
                .content_type(ContentType::plaintext())
                .body(self.to_string()),
            _ => response.json(json!({ "error": self.to_string() })),
        }
    }
}
