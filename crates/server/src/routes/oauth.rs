//! OAuth route handlers.
//!
//! Both providers share the same two-step shape:
//! - Initiation: build the authorization URL, stash CSRF state and PKCE
//!   verifier in the session, redirect the browser to the provider.
//! - Callback: validate state, exchange the code, fetch the profile, then
//!   sign the user in (creating the account and cart on first login).

use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use oauth2::PkceCodeVerifier;
use serde::Deserialize;
use tower_sessions::Session;

use super::sessions::UserResponse;
use crate::error::AppError;
use crate::middleware::set_current_user;
use crate::models::session_keys;
use crate::oauth::{OAuthError, ProviderClient};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Query parameters from a provider OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Initiate GitHub OAuth login.
///
/// # Route
///
/// `GET /api/sessions/github`
pub async fn github(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    start_flow(state.github(), &session).await
}

/// Handle the GitHub OAuth callback.
///
/// # Route
///
/// `GET /api/sessions/github/callback`
pub async fn github_callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<UserResponse>, AppError> {
    finish_flow(state.github(), &state, &session, query).await
}

/// Initiate Google OAuth login.
///
/// # Route
///
/// `GET /api/sessions/google`
pub async fn google(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    start_flow(state.google(), &session).await
}

/// Handle the Google OAuth callback.
///
/// # Route
///
/// `GET /api/sessions/google/callback`
pub async fn google_callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<UserResponse>, AppError> {
    finish_flow(state.google(), &state, &session, query).await
}

// =============================================================================
// Shared flow
// =============================================================================

/// Build the authorization redirect and stash the callback validation data.
async fn start_flow<C: ProviderClient>(
    client: &C,
    session: &Session,
) -> Result<Redirect, AppError> {
    let request = client.authorize_url();

    session
        .insert(session_keys::OAUTH_STATE, request.state.secret())
        .await?;
    session
        .insert(session_keys::OAUTH_PKCE_VERIFIER, request.verifier.secret())
        .await?;

    Ok(Redirect::to(request.url.as_str()))
}

/// Validate the callback, complete the handshake, and establish the session.
async fn finish_flow<C: ProviderClient>(
    client: &C,
    state: &AppState,
    session: &Session,
    query: CallbackQuery,
) -> Result<Json<UserResponse>, AppError> {
    // Provider-reported authorization errors
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!(provider = %client.provider(), %error, %description, "oauth denied");
        return Err(OAuthError::Denied(error).into());
    }

    let code = query
        .code
        .ok_or_else(|| AppError::BadRequest("missing authorization code".to_string()))?;
    let returned_state = query
        .state
        .ok_or_else(|| AppError::BadRequest("missing state parameter".to_string()))?;

    // CSRF check against the value stored at initiation
    let stored_state: Option<String> = session
        .get(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();
    if stored_state.as_deref() != Some(returned_state.as_str()) {
        tracing::warn!(provider = %client.provider(), "oauth state mismatch");
        return Err(OAuthError::StateMismatch.into());
    }

    let verifier: String = session
        .get(session_keys::OAUTH_PKCE_VERIFIER)
        .await
        .ok()
        .flatten()
        .ok_or_else(|| AppError::BadRequest("missing pkce verifier".to_string()))?;

    // Both values are one-time use; a removal failure leaves them replayable
    if let Err(e) = session.remove::<String>(session_keys::OAUTH_STATE).await {
        tracing::warn!(error = %e, "failed to clear oauth state from session");
    }
    if let Err(e) = session
        .remove::<String>(session_keys::OAUTH_PKCE_VERIFIER)
        .await
    {
        tracing::warn!(error = %e, "failed to clear pkce verifier from session");
    }

    let profile = client
        .fetch_profile(code, PkceCodeVerifier::new(verifier))
        .await?;

    let user = AuthService::new(state.pool())
        .login_with_provider(&profile)
        .await?;

    set_current_user(session, &user).await?;
    tracing::info!(provider = %client.provider(), user_id = %user.id, "oauth login");

    Ok(Json(user.into()))
}
