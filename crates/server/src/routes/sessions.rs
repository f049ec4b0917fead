//! Local credential session routes.
//!
//! Registration, login, logout, and the current-user endpoint.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use shopd_core::{AuthProvider, CartId, Email, UserId};

use crate::error::AppError;
use crate::middleware::{RequireUser, clear_current_user, set_current_user};
use crate::models::User;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// User payload returned by the session endpoints.
///
/// Timestamps and the password hash stay out of the API surface.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub provider: AuthProvider,
    pub cart_id: CartId,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            age: user.age,
            provider: user.provider,
            cart_id: user.cart_id,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new account.
///
/// Creates the user and their cart, then logs the user in.
///
/// # Route
///
/// `POST /api/sessions/register`
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = AuthService::new(state.pool())
        .register(Registration {
            email: &body.email,
            password: &body.password,
            first_name: &body.first_name,
            last_name: &body.last_name,
            age: body.age,
        })
        .await?;

    set_current_user(&session, &user).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Login with email and password.
///
/// # Route
///
/// `POST /api/sessions/login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<Json<UserResponse>, AppError> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    set_current_user(&session, &user).await?;

    Ok(Json(user.into()))
}

/// Logout, destroying the whole session.
///
/// # Route
///
/// `POST /api/sessions/logout`
pub async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_user(&session).await?;
    session.flush().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// The current logged-in user, re-hydrated from the database.
///
/// # Route
///
/// `GET /api/sessions/current`
pub async fn current(RequireUser(user): RequireUser) -> Json<UserResponse> {
    Json(user.into())
}
