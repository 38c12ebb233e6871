//! API integration tests
//!
//! Expects a running server with a seeded user id 1.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:9090";
const SHARER_USER_HEADER: &str = "X-Sharer-User-Id";
const UNKNOWN_USER: i64 = 999_999_999;

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_missing_user_header() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "BadRequest");
}

#[tokio::test]
#[ignore]
async fn test_unknown_user_listing() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .header(SHARER_USER_HEADER, UNKNOWN_USER)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_unknown_state() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings/owner?state=SOMETIMES", BASE_URL))
        .header(SHARER_USER_HEADER, 1)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Unknown state: UNSUPPORTED_STATUS");
}

#[tokio::test]
#[ignore]
async fn test_invalid_pagination() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings?from=-1&size=10", BASE_URL))
        .header(SHARER_USER_HEADER, 1)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_list_all_bookings() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings?state=ALL&from=0&size=20", BASE_URL))
        .header(SHARER_USER_HEADER, 1)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_create_booking_without_window() {
    let client = Client::new();

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(SHARER_USER_HEADER, 1)
        .json(&json!({ "itemId": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_unknown_booking() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, UNKNOWN_USER))
        .header(SHARER_USER_HEADER, 1)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
