use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use tracing::{debug, error};

use crate::error::{ApiError, StoreError};
use crate::models::NewReview;
use crate::store::{DealershipStore, ReviewStore};

/// Register every route against the store type `S`, which must be registered as `web::Data<S>`.
pub fn configure<S>(cfg: &mut web::ServiceConfig)
where
    S: ReviewStore + DealershipStore + 'static,
{
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/", web::get().to(index))
        .route("/fetchReviews", web::get().to(fetch_reviews::<S>))
        .route(
            "/fetchReviews/dealer/{id}",
            web::get().to(fetch_reviews_by_dealer::<S>),
        )
        .route("/fetchDealers", web::get().to(fetch_dealers::<S>))
        .route("/fetchDealers/{state}", web::get().to(fetch_dealers_by_state::<S>))
        .route("/fetchDealer/{id}", web::get().to(fetch_dealer::<S>))
        .route("/insert_review", web::post().to(insert_review::<S>));
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("[API] Rejected review body: {}", err);
    ApiError::InvalidBody(err).into()
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Welcome to the Mongoose API")
}

pub async fn fetch_reviews<S: ReviewStore>(store: web::Data<S>) -> Result<HttpResponse, ApiError> {
    let reviews = store.list_reviews().await.map_err(|e| {
        error!("[API] Failed to fetch reviews: {}", e);
        ApiError::FetchReviews(e)
    })?;
    Ok(HttpResponse::Ok().json(reviews))
}

pub async fn fetch_reviews_by_dealer<S: ReviewStore>(
    store: web::Data<S>,
    dealer_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let reviews = store
        .list_reviews_by_dealer(&dealer_id)
        .await
        .map_err(|e| {
            error!("[API] Failed to fetch reviews for dealer {}: {}", dealer_id, e);
            ApiError::FetchReviews(e)
        })?;
    Ok(HttpResponse::Ok().json(reviews))
}

pub async fn fetch_dealers<S: DealershipStore>(
    store: web::Data<S>,
) -> Result<HttpResponse, ApiError> {
    let dealers = store.list_dealerships().await.map_err(dealer_failure)?;
    Ok(HttpResponse::Ok().json(dealers))
}

pub async fn fetch_dealers_by_state<S: DealershipStore>(
    store: web::Data<S>,
    state: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let dealers = store
        .list_dealerships_by_state(&state)
        .await
        .map_err(dealer_failure)?;
    Ok(HttpResponse::Ok().json(dealers))
}

pub async fn fetch_dealer<S: DealershipStore>(
    store: web::Data<S>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    match store.get_dealership(&id).await {
        Ok(dealer) => Ok(HttpResponse::Ok().json(dealer)),
        Err(StoreError::NotFound { .. }) => {
            debug!("[API] Dealer {} not found", id);
            Err(ApiError::DealerNotFound)
        }
        Err(e) => Err(dealer_failure(e)),
    }
}

fn dealer_failure(e: StoreError) -> ApiError {
    error!("[API] Dealer query failed: {}", e);
    ApiError::Dealers(e)
}

pub async fn insert_review<S: ReviewStore>(
    store: web::Data<S>,
    review: web::Json<NewReview>,
) -> Result<HttpResponse, ApiError> {
    let review = review.into_inner();
    debug!("[API] Received review from {} for dealership {}", review.name, review.dealership);

    let saved = store.insert_review(review).await.map_err(|e| {
        error!("[API] Error inserting review: {}", e);
        ApiError::InsertReview(e)
    })?;
    debug!("[API] Saved review {}", saved.id);
    Ok(HttpResponse::Ok().json(saved))
}
