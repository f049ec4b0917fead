//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::oauth::OAuthError;
use crate::services::auth::AuthError;

/// Application-level error type for the shopd API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// OAuth flow failed.
    #[error("OAuth error: {0}")]
    OAuth(#[from] OAuthError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status the error maps to.
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AuthError::UserNotFound | AuthError::IncorrectPassword => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::OAuth(err) => match err {
                OAuthError::StateMismatch | OAuthError::Denied(_) => StatusCode::BAD_REQUEST,
                OAuthError::MissingEmail | OAuthError::InvalidEmail(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                OAuthError::Exchange(_) | OAuthError::Profile(_) => StatusCode::BAD_GATEWAY,
                OAuthError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message safe to show the client.
    ///
    /// Server-class errors get a generic body; the detail goes to Sentry and
    /// the logs instead.
    fn client_message(&self) -> String {
        if self.status().is_server_error() {
            "internal error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors and upstream provider failures to Sentry
        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopd_core::EmailError;

    #[test]
    fn auth_errors_map_to_client_statuses() {
        assert_eq!(
            AppError::Auth(AuthError::UserNotFound).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Auth(AuthError::IncorrectPassword).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Auth(AuthError::EmailTaken).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Auth(AuthError::InvalidEmail(EmailError::Empty)).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn oauth_errors_map_to_gateway_or_client_statuses() {
        assert_eq!(
            AppError::OAuth(OAuthError::StateMismatch).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::OAuth(OAuthError::Exchange("boom".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn server_errors_hide_details_from_clients() {
        let err = AppError::Internal("connection pool exhausted".into());
        assert_eq!(err.client_message(), "internal error");

        let err = AppError::Auth(AuthError::EmailTaken);
        assert_eq!(err.client_message(), "Auth error: email is already registered");
    }
}
