//! Authentication extractors and session identity helpers.
//!
//! The session stores only a [`CurrentUser`] (id + email); the extractor
//! re-hydrates the full user row from the database on every request, so a
//! deleted account stops authenticating as soon as its row is gone.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentUser, User, session_keys};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Store the logged-in user's identity in the session.
///
/// # Errors
///
/// Returns the session store error if the write fails.
pub async fn set_current_user(
    session: &Session,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CURRENT_USER, CurrentUser::from(user))
        .await
}

/// Remove the logged-in user's identity from the session.
///
/// # Errors
///
/// Returns the session store error if the removal fails.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .map(|_| ())
}

/// Extractor that requires a logged-in user.
///
/// Rejects with 401 when there is no session identity or the referenced user
/// row no longer exists.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Session is placed in extensions by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let current: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AppError::Unauthorized("not logged in".to_string()))?;

        let user = AuthService::new(state.pool())
            .user_for_session(current.id)
            .await
            .map_err(|e| match e {
                // Session points at a deleted account
                AuthError::UserNotFound => {
                    AppError::Unauthorized("account no longer exists".to_string())
                }
                other => AppError::Auth(other),
            })?;

        Ok(Self(user))
    }
}
