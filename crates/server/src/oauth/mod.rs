//! OAuth provider clients.
//!
//! Each provider wraps an `oauth2::BasicClient` for the authorization-code
//! handshake (with PKCE and CSRF state) plus a `reqwest` client for the
//! profile fetch that follows the token exchange. The handshake itself is
//! entirely the `oauth2` crate's job; this module's output is an
//! [`OAuthProfile`] normalized enough for the auth service to act on.

pub mod github;
pub mod google;

pub use github::GitHubClient;
pub use google::GoogleClient;

use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, ClientSecret, CsrfToken, PkceCodeVerifier, RedirectUrl, TokenUrl};
use secrecy::ExposeSecret;
use thiserror::Error;

use shopd_core::{AuthProvider, Email, EmailError};

use crate::config::OAuthProviderConfig;

/// Errors from the OAuth flows.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// A provider endpoint or redirect URL failed to parse.
    #[error("invalid oauth url: {0}")]
    InvalidUrl(#[from] oauth2::url::ParseError),

    /// Token exchange with the provider failed.
    #[error("token exchange failed: {0}")]
    Exchange(String),

    /// Fetching the provider profile failed.
    #[error("profile fetch failed: {0}")]
    Profile(#[from] reqwest::Error),

    /// The provider profile carried no usable email address.
    #[error("provider profile has no email")]
    MissingEmail,

    /// The provider profile email did not parse.
    #[error("provider profile email invalid: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The callback's `state` parameter did not match the session.
    #[error("oauth state mismatch")]
    StateMismatch,

    /// The provider reported an authorization error.
    #[error("authorization denied: {0}")]
    Denied(String),
}

/// Normalized identity extracted from a provider profile.
#[derive(Debug, Clone)]
pub struct OAuthProfile {
    /// Which provider authenticated the user.
    pub provider: AuthProvider,
    /// Email derived from the profile (possibly synthesized, see
    /// [`github::GitHubClient`]).
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
}

/// Pending authorization redirect: where to send the browser plus the
/// values to stash in the session for callback validation.
pub struct AuthorizeRequest {
    /// Provider authorization page URL.
    pub url: oauth2::url::Url,
    /// CSRF state echoed back by the provider.
    pub state: CsrfToken,
    /// PKCE verifier to present during the token exchange.
    pub verifier: PkceCodeVerifier,
}

/// Common surface of the provider clients, used by the callback routes.
pub trait ProviderClient {
    /// Which provider this client talks to.
    fn provider(&self) -> AuthProvider;

    /// Build the authorization redirect for this provider.
    fn authorize_url(&self) -> AuthorizeRequest;

    /// Exchange the authorization code and fetch the user's profile.
    async fn fetch_profile(
        &self,
        code: String,
        verifier: PkceCodeVerifier,
    ) -> Result<OAuthProfile, OAuthError>;
}

/// Build a configured `BasicClient` for a provider.
fn build_client(
    config: &OAuthProviderConfig,
    auth_url: &str,
    token_url: &str,
    redirect_url: String,
) -> Result<BasicClient, OAuthError> {
    Ok(BasicClient::new(
        ClientId::new(config.client_id.clone()),
        Some(ClientSecret::new(
            config.client_secret.expose_secret().to_owned(),
        )),
        AuthUrl::new(auth_url.to_owned())?,
        Some(TokenUrl::new(token_url.to_owned())?),
    )
    .set_redirect_uri(RedirectUrl::new(redirect_url)?))
}
