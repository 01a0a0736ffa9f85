//! Live-server API tests
//!
//! Start the server first (`RUN_MODE=development cargo run`), then run with
//! `cargo test -- --ignored`.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio_test::assert_ok;

const BASE_URL: &str = "http://localhost:8080";

/// Name that will not collide with records from earlier runs
fn unique(prefix: &str) -> String {
    format!("{} {}", prefix, uuid::Uuid::new_v4().simple())
}

async fn post(client: &Client, path: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}{}", BASE_URL, path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
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
async fn test_readiness_check() {
    let response = assert_ok!(reqwest::get(format!("{}/ready", BASE_URL)).await);
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_visit_counter_follows_cookie() {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build client");

    let mut counts = Vec::new();
    for _ in 0..3 {
        let body: Value = client
            .get(format!("{}/catalog/", BASE_URL))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");
        counts.push(body["num_visits"].as_i64().expect("num_visits"));
    }
    assert_eq!(counts, vec![0, 1, 2]);

    // No cookie jar: every request is a new session
    let body: Value = Client::new()
        .get(format!("{}/catalog/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["num_visits"], 0);
}

#[tokio::test]
#[ignore]
async fn test_genre_names_unique_ignoring_case() {
    let client = Client::new();
    let name = unique("Genre");

    let created = post(&client, "/admin/genres", json!({ "name": name })).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let genre: Value = created.json().await.expect("Failed to parse response");

    let duplicate = post(&client, "/admin/genres", json!({ "name": name.to_uppercase() })).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let response = client
        .delete(format!("{}/admin/genres/{}", BASE_URL, genre["id"]))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_catalog_round_trip() {
    let client = Client::new();

    let author: Value = post(
        &client,
        "/admin/authors",
        json!({ "first_name": "Test", "last_name": unique("Author") }),
    )
    .await
    .json()
    .await
    .expect("Failed to parse author");
    let language: Value = post(&client, "/admin/languages", json!({ "name": unique("Language") }))
        .await
        .json()
        .await
        .expect("Failed to parse language");

    let book_response = post(
        &client,
        &format!("/admin/authors/{}/books", author["id"]),
        json!({
            "title": "A Tale of Two Cities",
            "summary": "It was the best of times.",
            "isbn": "9780141439600",
            "language_id": language["id"]
        }),
    )
    .await;
    assert_eq!(book_response.status(), StatusCode::CREATED);
    let book: Value = book_response.json().await.expect("Failed to parse book");

    let copy_response = post(
        &client,
        &format!("/admin/books/{}/instances", book["id"]),
        json!({ "imprint": "Penguin", "status": "a" }),
    )
    .await;
    assert_eq!(copy_response.status(), StatusCode::CREATED);
    let copy: Value = copy_response.json().await.expect("Failed to parse copy");

    let detail: Value = client
        .get(format!("{}/catalog/book/{}", BASE_URL, book["id"]))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(detail["instances"][0]["id"], copy["id"]);

    // Restrict-on-delete holds until the copy is gone
    let protected = client
        .delete(format!("{}/admin/books/{}", BASE_URL, book["id"]))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(protected.status(), StatusCode::CONFLICT);

    for path in [
        format!("/admin/instances/{}", copy["id"].as_str().expect("uuid")),
        format!("/admin/books/{}", book["id"]),
        format!("/admin/authors/{}", author["id"]),
        format!("/admin/languages/{}", language["id"]),
    ] {
        let response = client
            .delete(format!("{}{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "DELETE {}", path);
    }
}

#[tokio::test]
#[ignore]
async fn test_invalid_page_is_not_found() {
    let response = reqwest::get(format!("{}/catalog/books?page=999999", BASE_URL))
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "InvalidPage");
}
