//! Integration tests for OAuth account provisioning.
//!
//! These tests drive the auth service against a migrated `PostgreSQL`
//! database directly; no running server is needed. The OAuth handshake
//! itself is skipped by constructing the provider profile in the test.
//!
//! Run with: cargo test -p shopd-integration-tests -- --ignored

use shopd_core::{AuthProvider, Email};
use shopd_server::oauth::OAuthProfile;
use shopd_server::services::auth::AuthService;
use uuid::Uuid;

/// Connect to the test database.
async fn test_pool() -> sqlx::PgPool {
    let url = std::env::var("SHOPD_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("SHOPD_DATABASE_URL must be set for integration tests");
    sqlx::PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database")
}

fn github_profile(email: &str) -> OAuthProfile {
    OAuthProfile {
        provider: AuthProvider::GitHub,
        email: Email::parse(email).expect("valid email"),
        first_name: "Octo".to_string(),
        last_name: "Cat".to_string(),
    }
}

#[tokio::test]
#[ignore = "Requires a migrated shopd database"]
async fn first_provider_login_creates_user_and_cart() {
    let pool = test_pool().await;
    let email = format!("oauth-{}@example.com", Uuid::new_v4().simple());

    let user = AuthService::new(&pool)
        .login_with_provider(&github_profile(&email))
        .await
        .expect("provider login failed");

    assert_eq!(user.email.as_str(), email);
    assert_eq!(user.provider, AuthProvider::GitHub);

    let (carts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cart WHERE id = $1")
        .bind(i64::from(user.cart_id))
        .fetch_one(&pool)
        .await
        .expect("cart count failed");
    assert_eq!(carts, 1);
}

#[tokio::test]
#[ignore = "Requires a migrated shopd database"]
async fn repeated_provider_login_reuses_the_account() {
    let pool = test_pool().await;
    let email = format!("oauth-{}@example.com", Uuid::new_v4().simple());
    let profile = github_profile(&email);

    let auth = AuthService::new(&pool);
    let first = auth
        .login_with_provider(&profile)
        .await
        .expect("first login failed");
    let second = auth
        .login_with_provider(&profile)
        .await
        .expect("second login failed");

    assert_eq!(first.id, second.id);
    assert_eq!(first.cart_id, second.cart_id);

    // Exactly one user row and one cart for the address
    let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shop_user WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .expect("user count failed");
    assert_eq!(users, 1);

    let (carts,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM cart WHERE id IN (SELECT cart_id FROM shop_user WHERE email = $1)",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .expect("cart count failed");
    assert_eq!(carts, 1);
}
