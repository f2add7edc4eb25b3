use std::path::Path;

use actix_web::{
    dev::ServiceResponse,
    http::{header::CONTENT_TYPE, StatusCode},
    test, web, App,
};
use serde_json::{json, Value};

use dealership_reviews::api;
use dealership_reviews::models::{Dealership, Review};
use dealership_reviews::seed::{bootstrap, SeedData};
use dealership_reviews::{Database, MemoryStore};

fn review_body(name: &str, dealership: Value) -> Value {
    json!({
        "name": name,
        "dealership": dealership,
        "review": "ok",
        "purchase": true,
        "purchase_date": "2024-01-01",
        "car_make": "Toyota",
        "car_model": "Corolla",
        "car_year": 2020
    })
}

// Build the app around an empty in-memory store
macro_rules! memory_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(MemoryStore::new()))
                .configure(api::configure::<MemoryStore>),
        )
        .await
    };
}

// Build the app around a SQLite database loaded from the bundled seed files
macro_rules! seeded_db_app {
    () => {
        test::init_service(
            App::new()
                .app_data(seeded_db().await)
                .configure(api::configure::<Database>),
        )
        .await
    };
}

async fn seeded_db() -> web::Data<Database> {
    let db = Database::new(":memory:").unwrap();
    db.create_schema().await.unwrap();
    let seed = SeedData::load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("data")).unwrap();
    bootstrap(&db, seed).await.unwrap();
    web::Data::new(db)
}

// Build the app around a database whose schema was never created, so every query fails
macro_rules! broken_db_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(Database::new(":memory:").unwrap()))
                .configure(api::configure::<Database>),
        )
        .await
    };
}

fn content_type(resp: &ServiceResponse) -> String {
    resp.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn body_text(resp: ServiceResponse) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[actix_web::test]
async fn test_index_is_liveness_text() {
    let app = memory_app!();
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "Welcome to the Mongoose API");
}

#[actix_web::test]
async fn test_insert_assigns_ids_and_filters_by_dealer() {
    let app = memory_app!();

    let req = test::TestRequest::post()
        .uri("/insert_review")
        .set_json(review_body("A", json!("5")))
        .to_request();
    let first: Review = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first.id, 1);
    assert_eq!(first.dealership, 5);
    assert_eq!(first.car_model, "Corolla");

    let req = test::TestRequest::post()
        .uri("/insert_review")
        .set_json(review_body("B", json!(5)))
        .to_request();
    let second: Review = test::call_and_read_body_json(&app, req).await;
    assert_eq!(second.id, 2);

    let req = test::TestRequest::post()
        .uri("/insert_review")
        .set_json(review_body("C", json!(9)))
        .to_request();
    let third: Review = test::call_and_read_body_json(&app, req).await;
    assert_eq!(third.id, 3);

    let req = test::TestRequest::get().uri("/fetchReviews/dealer/5").to_request();
    let for_five: Vec<Review> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(for_five, vec![first.clone(), second.clone()]);

    let req = test::TestRequest::get().uri("/fetchReviews").to_request();
    let all: Vec<Review> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all, vec![first, second, third]);
}

#[actix_web::test]
async fn test_client_supplied_id_is_ignored() {
    let app = memory_app!();
    let mut body = review_body("A", json!(1));
    body["id"] = json!(500);

    let req = test::TestRequest::post()
        .uri("/insert_review")
        .set_json(body)
        .to_request();
    let saved: Review = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved.id, 1);
}

#[actix_web::test]
async fn test_reviews_for_unknown_dealer_are_empty() {
    let app = memory_app!();

    for uri in ["/fetchReviews/dealer/42", "/fetchReviews/dealer/unknown"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let reviews: Vec<Review> = test::read_body_json(resp).await;
        assert!(reviews.is_empty());
    }
}

#[actix_web::test]
async fn test_malformed_review_body_is_rejected() {
    let app = memory_app!();

    let req = test::TestRequest::post()
        .uri("/insert_review")
        .set_json(json!({ "name": "A", "dealership": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Error inserting review" }));

    // Nothing was stored
    let req = test::TestRequest::get().uri("/fetchReviews").to_request();
    let all: Vec<Review> = test::call_and_read_body_json(&app, req).await;
    assert!(all.is_empty());
}

#[actix_web::test]
async fn test_seeded_dealer_routes() {
    let app = seeded_db_app!();

    let req = test::TestRequest::get().uri("/fetchDealers").to_request();
    let all: Vec<Dealership> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 8);

    let req = test::TestRequest::get().uri("/fetchDealers/Kansas").to_request();
    let kansas: Vec<Dealership> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(kansas.iter().map(|d| d.id).collect::<Vec<_>>(), vec![7, 8]);
    assert!(kansas.iter().all(|d| d.state == "Kansas"));

    let req = test::TestRequest::get().uri("/fetchDealers/Nowhere").to_request();
    let none: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(none.is_empty());

    let req = test::TestRequest::get().uri("/fetchDealer/3").to_request();
    let dealer: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(dealer["id"], 3);
    assert_eq!(dealer["city"], "Birmingham");
    assert_eq!(dealer["full_name"], "Sub-Ex Car Dealership");
}

#[actix_web::test]
async fn test_missing_dealer_is_plain_text_404() {
    let app = seeded_db_app!();

    for uri in ["/fetchDealer/nonexistent", "/fetchDealer/999"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(resp).await, "Dealer not found");
    }
}

#[actix_web::test]
async fn test_insert_after_bootstrap_continues_from_seed_ids() {
    let app = seeded_db_app!();

    let req = test::TestRequest::get().uri("/fetchReviews").to_request();
    let seeded: Vec<Review> = test::call_and_read_body_json(&app, req).await;
    let max_id = seeded.iter().map(|r| r.id).max().unwrap();

    let req = test::TestRequest::post()
        .uri("/insert_review")
        .set_json(review_body("New", json!("5")))
        .to_request();
    let saved: Review = test::call_and_read_body_json(&app, req).await;
    assert_eq!(saved.id, max_id + 1);

    let req = test::TestRequest::get().uri("/fetchReviews/dealer/5").to_request();
    let for_five: Vec<Review> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(for_five.last(), Some(&saved));
    assert!(for_five.iter().all(|r| r.dealership == 5));
}

#[actix_web::test]
async fn test_review_storage_failures_are_json_500() {
    let app = broken_db_app!();

    for uri in ["/fetchReviews", "/fetchReviews/dealer/5"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(content_type(&resp).starts_with("application/json"));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Error fetching documents" }));
    }

    let req = test::TestRequest::post()
        .uri("/insert_review")
        .set_json(review_body("A", json!(5)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(content_type(&resp).starts_with("application/json"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Error inserting review" }));
}

#[actix_web::test]
async fn test_dealer_storage_failures_are_raw_text_500() {
    let app = broken_db_app!();

    for uri in ["/fetchDealers", "/fetchDealers/Texas", "/fetchDealer/3"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(content_type(&resp).starts_with("text/plain"));
        let body = body_text(resp).await;
        assert!(body.starts_with("storage error:"), "unexpected body {body:?}");
        assert!(body.contains("no such table: dealerships"));
    }
}
