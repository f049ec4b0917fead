//! Google OAuth client.

use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{AuthorizationCode, CsrfToken, PkceCodeChallenge, PkceCodeVerifier, Scope, TokenResponse};
use serde::Deserialize;

use shopd_core::{AuthProvider, Email};

use super::{AuthorizeRequest, OAuthError, OAuthProfile, ProviderClient, build_client};
use crate::config::OAuthProviderConfig;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_API: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// User info from Google's `userinfo` endpoint.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    email: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    name: Option<String>,
}

/// Google OAuth client.
pub struct GoogleClient {
    oauth: BasicClient,
    http: reqwest::Client,
}

impl GoogleClient {
    /// Create a Google client from application credentials.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::InvalidUrl` if `redirect_url` does not parse.
    pub fn new(config: &OAuthProviderConfig, redirect_url: String) -> Result<Self, OAuthError> {
        let oauth = build_client(config, AUTH_URL, TOKEN_URL, redirect_url)?;
        let http = reqwest::Client::new();

        Ok(Self { oauth, http })
    }
}

impl ProviderClient for GoogleClient {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Google
    }

    fn authorize_url(&self) -> AuthorizeRequest {
        let (pkce_challenge, verifier) = PkceCodeChallenge::new_random_sha256();

        let (url, state) = self
            .oauth
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        AuthorizeRequest {
            url,
            state,
            verifier,
        }
    }

    async fn fetch_profile(
        &self,
        code: String,
        verifier: PkceCodeVerifier,
    ) -> Result<OAuthProfile, OAuthError> {
        let token = self
            .oauth
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(verifier)
            .request_async(async_http_client)
            .await
            .map_err(|e| OAuthError::Exchange(e.to_string()))?;

        let info: GoogleUserInfo = self
            .http
            .get(USERINFO_API)
            .bearer_auth(token.access_token().secret())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        profile_from(info)
    }
}

/// Derive an [`OAuthProfile`] from the Google userinfo response.
///
/// Google always returns an email for the `email` scope; a response without
/// one is treated as a provider error rather than synthesized around.
fn profile_from(info: GoogleUserInfo) -> Result<OAuthProfile, OAuthError> {
    let email = Email::parse(&info.email.ok_or(OAuthError::MissingEmail)?)?;

    let display_name = info.name.unwrap_or_else(|| email.local_part().to_owned());
    let first_name = info.given_name.unwrap_or_else(|| display_name.clone());
    let last_name = info.family_name.unwrap_or(display_name);

    Ok(OAuthProfile {
        provider: AuthProvider::Google,
        email,
        first_name,
        last_name,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn splits_given_and_family_names() {
        let profile = profile_from(GoogleUserInfo {
            email: Some("Ada@Example.com".to_string()),
            given_name: Some("Ada".to_string()),
            family_name: Some("Lovelace".to_string()),
            name: Some("Ada Lovelace".to_string()),
        })
        .unwrap();

        assert_eq!(profile.email.as_str(), "ada@example.com");
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.last_name, "Lovelace");
        assert_eq!(profile.provider, AuthProvider::Google);
    }

    #[test]
    fn missing_email_is_an_error() {
        let result = profile_from(GoogleUserInfo {
            email: None,
            given_name: None,
            family_name: None,
            name: None,
        });
        assert!(matches!(result, Err(OAuthError::MissingEmail)));
    }

    #[test]
    fn falls_back_to_local_part_for_names() {
        let profile = profile_from(GoogleUserInfo {
            email: Some("ada@example.com".to_string()),
            given_name: None,
            family_name: None,
            name: None,
        })
        .unwrap();
        assert_eq!(profile.first_name, "ada");
        assert_eq!(profile.last_name, "ada");
    }
}
