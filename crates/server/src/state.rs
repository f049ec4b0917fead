//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use shopd_core::AuthProvider;

use crate::config::ServerConfig;
use crate::oauth::{GitHubClient, GoogleClient, OAuthError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the database pool,
/// and the configured OAuth provider clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    github: GitHubClient,
    google: GoogleClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the OAuth callback URLs derived from the
    /// configured base URL are invalid.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, OAuthError> {
        let github = GitHubClient::new(
            &config.github,
            config.callback_url(AuthProvider::GitHub),
        )?;
        let google = GoogleClient::new(
            &config.google,
            config.callback_url(AuthProvider::Google),
        )?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                github,
                google,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the GitHub OAuth client.
    #[must_use]
    pub fn github(&self) -> &GitHubClient {
        &self.inner.github
    }

    /// Get a reference to the Google OAuth client.
    #[must_use]
    pub fn google(&self) -> &GoogleClient {
        &self.inner.google
    }
}
