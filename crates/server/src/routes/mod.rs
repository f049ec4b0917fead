//! HTTP route handlers for the shopd API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database ping)
//!
//! # Sessions
//! POST /api/sessions/register           - Create an account (and its cart)
//! POST /api/sessions/login              - Local credential login
//! POST /api/sessions/logout             - Clear the session
//! GET  /api/sessions/current            - Re-hydrated current user
//!
//! # OAuth
//! GET  /api/sessions/github             - Redirect to GitHub authorization
//! GET  /api/sessions/github/callback    - GitHub OAuth callback
//! GET  /api/sessions/google             - Redirect to Google authorization
//! GET  /api/sessions/google/callback    - Google OAuth callback
//! ```

pub mod oauth;
pub mod sessions;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the session routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(sessions::register))
        .route("/login", post(sessions::login))
        .route("/logout", post(sessions::logout))
        .route("/current", get(sessions::current))
        // OAuth providers
        .route("/github", get(oauth::github))
        .route("/github/callback", get(oauth::github_callback))
        .route("/google", get(oauth::google))
        .route("/google/callback", get(oauth::google_callback))
}

/// Create all routes for the shopd API.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api/sessions", session_routes())
}
