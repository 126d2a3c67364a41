//! API integration tests
//!
//! Run against a live server: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000/api";

/// Create a book with a unique name and return its id
async fn create_test_book(client: &Client, name: &str) -> String {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send create request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_str().expect("No id in response").to_string()
}

async fn delete_test_book(client: &Client, book_id: &str) {
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send delete request");
    assert_eq!(response.status(), 204);
}

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
async fn test_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_create_and_get_book() {
    let client = Client::new();
    let book_id = create_test_book(&client, "Integration Test Book").await;

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Integration Test Book");
    assert_eq!(body["status"], "normal");
    assert_eq!(body["quantity"], 0);

    delete_test_book(&client, &book_id).await;
}

#[tokio::test]
#[ignore]
async fn test_create_book_without_name_fails() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "author": "Nobody" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_get_missing_book_is_404() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/no-such-book", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_update_book_partial() {
    let client = Client::new();
    let book_id = create_test_book(&client, "Before Update").await;

    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .json(&json!({ "publisher": "Test House" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Before Update");
    assert_eq!(body["publisher"], "Test House");

    delete_test_book(&client, &book_id).await;
}

#[tokio::test]
#[ignore]
async fn test_copy_lifecycle() {
    let client = Client::new();
    let book_id = create_test_book(&client, "Copy Lifecycle Book").await;

    // Add a copy without an explicit id
    let response = client
        .post(format!("{}/books/{}/copies", BASE_URL, book_id))
        .json(&json!({ "location": "shelf 1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["quantity"], 1);
    let copy_id = body["copies"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(copy_id, format!("{}-01", book_id));
    assert_eq!(body["copies"][0]["status"], "pending");

    // Borrow it
    let response = client
        .post(format!(
            "{}/books/{}/copies/{}/borrow",
            BASE_URL, book_id, copy_id
        ))
        .json(&json!({ "borrower": "Ada" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "allBorrowed");
    assert_eq!(body["copies"][0]["status"], "borrowed");
    assert_eq!(body["borrowCount"], 1);

    // Borrowing again conflicts
    let response = client
        .post(format!(
            "{}/books/{}/copies/{}/borrow",
            BASE_URL, book_id, copy_id
        ))
        .json(&json!({ "borrower": "Grace" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Return it
    let response = client
        .post(format!(
            "{}/books/{}/copies/{}/return",
            BASE_URL, book_id, copy_id
        ))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "normal");
    assert_eq!(body["copies"][0]["status"], "available");
    let records = body["copies"][0]["borrowRecords"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_ne!(records[0]["returnTime"], "");

    delete_test_book(&client, &book_id).await;
}

#[tokio::test]
#[ignore]
async fn test_archive_copy() {
    let client = Client::new();
    let book_id = create_test_book(&client, "Archive Test Book").await;

    let response = client
        .post(format!("{}/books/{}/copies", BASE_URL, book_id))
        .json(&json!({ "status": "damaged" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let copy_id = body["copies"][0]["id"].as_str().unwrap().to_string();

    let response = client
        .post(format!(
            "{}/books/{}/copies/{}/archive",
            BASE_URL, book_id, copy_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["copies"][0]["status"], "available");

    delete_test_book(&client, &book_id).await;
}

#[tokio::test]
#[ignore]
async fn test_remove_copy_returns_book() {
    let client = Client::new();
    let book_id = create_test_book(&client, "Remove Copy Book").await;

    let response = client
        .post(format!("{}/books/{}/copies", BASE_URL, book_id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let copy_id = body["copies"][0]["id"].as_str().unwrap().to_string();

    let response = client
        .delete(format!(
            "{}/books/{}/copies/{}",
            BASE_URL, book_id, copy_id
        ))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["quantity"], 0);

    delete_test_book(&client, &book_id).await;
}
