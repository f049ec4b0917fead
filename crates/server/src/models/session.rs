//! Session-related types.
//!
//! Types stored in the session for authentication state. Only the user's
//! identity goes into the session; the full record is re-hydrated from the
//! database on each request.

use serde::{Deserialize, Serialize};

use shopd_core::{Email, UserId};

use crate::models::User;

/// Session-stored user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the OAuth CSRF state parameter.
    pub const OAUTH_STATE: &str = "oauth_state";

    /// Key for the OAuth PKCE code verifier.
    pub const OAUTH_PKCE_VERIFIER: &str = "oauth_pkce_verifier";
}
