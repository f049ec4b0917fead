//! Integration tests for the session endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The shopd server running (cargo run -p shopd-server)
//!
//! Run with: cargo test -p shopd-integration-tests -- --ignored

use reqwest::{Client, StatusCode, redirect};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the shopd API (configurable via environment).
fn base_url() -> String {
    std::env::var("SHOPD_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Create an HTTP client with a cookie store so the session survives
/// across requests.
fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Connect to the test database for record-level assertions.
async fn test_pool() -> sqlx::PgPool {
    let url = std::env::var("SHOPD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("SHOPD_DATABASE_URL must be set for integration tests");
    sqlx::PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database")
}

/// A unique email per test run so reruns don't collide.
fn unique_email() -> String {
    format!("it-{}@example.com", Uuid::new_v4().simple())
}

fn registration_body(email: &str) -> Value {
    json!({
        "email": email,
        "password": "integration-pass",
        "first_name": "Inte",
        "last_name": "Gration",
        "age": 30,
    })
}

async fn register(client: &Client, email: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/sessions/register", base_url()))
        .json(&registration_body(email))
        .send()
        .await
        .expect("Failed to send register request")
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shopd server and database"]
async fn register_creates_user_and_empty_cart() {
    let client = session_client();
    let email = unique_email();

    let resp = register(&client, &email).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body["email"], email);
    assert_eq!(body["provider"], "local");
    let cart_id = body["cart_id"].as_i64().expect("cart_id missing");

    // The linked cart exists and is empty
    let pool = test_pool().await;
    let (quantity, items): (i32, Value) =
        sqlx::query_as("SELECT quantity, items FROM cart WHERE id = $1")
            .bind(cart_id)
            .fetch_one(&pool)
            .await
            .expect("cart row missing");
    assert_eq!(quantity, 0);
    assert_eq!(items, json!([]));
}

#[tokio::test]
#[ignore = "Requires running shopd server and database"]
async fn register_rejects_duplicate_email_without_new_records() {
    let client = session_client();
    let email = unique_email();

    let resp = register(&client, &email).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let pool = test_pool().await;
    let (users_before, carts_before) = record_counts(&pool).await;

    let resp = register(&session_client(), &email).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let (users_after, carts_after) = record_counts(&pool).await;
    assert_eq!(users_before, users_after);
    assert_eq!(carts_before, carts_after);
}

async fn record_counts(pool: &sqlx::PgPool) -> (i64, i64) {
    let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shop_user")
        .fetch_one(pool)
        .await
        .expect("user count failed");
    let (carts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cart")
        .fetch_one(pool)
        .await
        .expect("cart count failed");
    (users, carts)
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shopd server and database"]
async fn login_succeeds_with_correct_credentials() {
    let client = session_client();
    let email = unique_email();
    register(&client, &email).await;

    let resp = session_client()
        .post(format!("{}/api/sessions/login", base_url()))
        .json(&json!({ "email": email, "password": "integration-pass" }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body["email"], email);
}

#[tokio::test]
#[ignore = "Requires running shopd server and database"]
async fn login_rejects_wrong_password_and_unknown_email() {
    let client = session_client();
    let email = unique_email();
    register(&client, &email).await;

    let resp = session_client()
        .post(format!("{}/api/sessions/login", base_url()))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = session_client()
        .post(format!("{}/api/sessions/login", base_url()))
        .json(&json!({ "email": unique_email(), "password": "integration-pass" }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Session identity bridging
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shopd server and database"]
async fn current_rehydrates_registered_user() {
    let client = session_client();
    let email = unique_email();

    let resp = register(&client, &email).await;
    let registered: Value = resp.json().await.expect("Failed to read response");

    // Same client carries the session cookie
    let resp = client
        .get(format!("{}/api/sessions/current", base_url()))
        .send()
        .await
        .expect("Failed to send current request");
    assert_eq!(resp.status(), StatusCode::OK);

    let current: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(current["id"], registered["id"]);
    assert_eq!(current["email"], registered["email"]);
    assert_eq!(current["cart_id"], registered["cart_id"]);
}

#[tokio::test]
#[ignore = "Requires running shopd server and database"]
async fn current_requires_a_session() {
    let resp = session_client()
        .get(format!("{}/api/sessions/current", base_url()))
        .send()
        .await
        .expect("Failed to send current request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running shopd server and database"]
async fn logout_ends_the_session() {
    let client = session_client();
    register(&client, &unique_email()).await;

    let resp = client
        .post(format!("{}/api/sessions/logout", base_url()))
        .send()
        .await
        .expect("Failed to send logout request");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/api/sessions/current", base_url()))
        .send()
        .await
        .expect("Failed to send current request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// OAuth initiation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running shopd server and database"]
async fn oauth_initiation_redirects_to_provider() {
    // Don't follow the redirect; we only assert on its target
    let client = Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client");

    for (path, host) in [
        ("github", "github.com"),
        ("google", "accounts.google.com"),
    ] {
        let resp = client
            .get(format!("{}/api/sessions/{path}", base_url()))
            .send()
            .await
            .expect("Failed to send oauth request");

        assert!(resp.status().is_redirection(), "{path} did not redirect");
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .expect("missing location header");
        assert!(location.contains(host), "unexpected target: {location}");
        assert!(location.contains("code_challenge"), "missing pkce: {location}");
    }
}
