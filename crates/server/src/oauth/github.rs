//! GitHub OAuth client.
//!
//! GitHub profiles may hide the email address; the fallback chain is the
//! `/user/emails` endpoint (primary verified address first), then a
//! synthesized `{login}@github.com` so the account still gets a stable,
//! unique login key.

use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{AuthorizationCode, CsrfToken, PkceCodeChallenge, PkceCodeVerifier, Scope, TokenResponse};
use serde::Deserialize;

use shopd_core::{AuthProvider, Email};

use super::{AuthorizeRequest, OAuthError, OAuthProfile, ProviderClient, build_client};
use crate::config::OAuthProviderConfig;

const AUTH_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_API: &str = "https://api.github.com/user";
const EMAILS_API: &str = "https://api.github.com/user/emails";

/// GitHub user info from the `/user` endpoint.
#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
    name: Option<String>,
    email: Option<String>,
}

/// Entry from the `/user/emails` endpoint.
#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// GitHub OAuth client.
pub struct GitHubClient {
    oauth: BasicClient,
    http: reqwest::Client,
}

impl GitHubClient {
    /// Create a GitHub client from application credentials.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError::InvalidUrl` if `redirect_url` does not parse.
    pub fn new(config: &OAuthProviderConfig, redirect_url: String) -> Result<Self, OAuthError> {
        let oauth = build_client(config, AUTH_URL, TOKEN_URL, redirect_url)?;
        // GitHub's API rejects requests without a User-Agent
        let http = reqwest::Client::builder()
            .user_agent("shopd")
            .build()?;

        Ok(Self { oauth, http })
    }

    async fn fetch_fallback_emails(&self, access_token: &str) -> Vec<GitHubEmail> {
        // Requires the user:email scope; treat any failure as "no addresses"
        // and let the synthesized fallback kick in.
        let response = self
            .http
            .get(EMAILS_API)
            .bearer_auth(access_token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await;

        match response {
            Ok(r) if r.status().is_success() => r.json().await.unwrap_or_default(),
            Ok(r) => {
                tracing::debug!(status = %r.status(), "github emails endpoint unavailable");
                Vec::new()
            }
            Err(e) => {
                tracing::debug!(error = %e, "github emails fetch failed");
                Vec::new()
            }
        }
    }
}

impl ProviderClient for GitHubClient {
    fn provider(&self) -> AuthProvider {
        AuthProvider::GitHub
    }

    fn authorize_url(&self) -> AuthorizeRequest {
        let (pkce_challenge, verifier) = PkceCodeChallenge::new_random_sha256();

        let (url, state) = self
            .oauth
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("read:user".to_string()))
            .add_scope(Scope::new("user:email".to_string()))
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

        let access_token = token.access_token().secret();

        let user: GitHubUser = self
            .http
            .get(USER_API)
            .bearer_auth(access_token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let fallback_emails = if user.email.is_some() {
            Vec::new()
        } else {
            self.fetch_fallback_emails(access_token).await
        };

        profile_from(user, &fallback_emails)
    }
}

/// Derive an [`OAuthProfile`] from the GitHub API responses.
///
/// GitHub exposes a single display name, so it fills both name fields.
fn profile_from(user: GitHubUser, fallback_emails: &[GitHubEmail]) -> Result<OAuthProfile, OAuthError> {
    let raw_email = user
        .email
        .or_else(|| {
            fallback_emails
                .iter()
                .find(|e| e.primary && e.verified)
                .or_else(|| fallback_emails.first())
                .map(|e| e.email.clone())
        })
        .unwrap_or_else(|| format!("{}@github.com", user.login));

    let email = Email::parse(&raw_email)?;
    let name = user.name.unwrap_or_else(|| user.login.clone());

    Ok(OAuthProfile {
        provider: AuthProvider::GitHub,
        email,
        first_name: name.clone(),
        last_name: name,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(login: &str, name: Option<&str>, email: Option<&str>) -> GitHubUser {
        GitHubUser {
            login: login.to_string(),
            name: name.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn uses_profile_email_when_present() {
        let profile = profile_from(user("octocat", Some("The Octocat"), Some("octo@example.com")), &[])
            .unwrap();
        assert_eq!(profile.email.as_str(), "octo@example.com");
        assert_eq!(profile.first_name, "The Octocat");
        assert_eq!(profile.last_name, "The Octocat");
    }

    #[test]
    fn prefers_primary_verified_fallback_email() {
        let emails = vec![
            GitHubEmail {
                email: "secondary@example.com".to_string(),
                primary: false,
                verified: true,
            },
            GitHubEmail {
                email: "primary@example.com".to_string(),
                primary: true,
                verified: true,
            },
        ];
        let profile = profile_from(user("octocat", None, None), &emails).unwrap();
        assert_eq!(profile.email.as_str(), "primary@example.com");
    }

    #[test]
    fn synthesizes_email_when_provider_omits_it() {
        let profile = profile_from(user("octocat", None, None), &[]).unwrap();
        assert_eq!(profile.email.as_str(), "octocat@github.com");
        // No display name either: the login fills both name fields
        assert_eq!(profile.first_name, "octocat");
        assert_eq!(profile.last_name, "octocat");
    }
}
