//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shopd_core::EmailError),

    /// Email is already registered.
    #[error("email is already registered")]
    EmailTaken,

    /// No account exists for the given email.
    #[error("user not found")]
    UserNotFound,

    /// Password hash comparison failed.
    #[error("incorrect password")]
    IncorrectPassword,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
