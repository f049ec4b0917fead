//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPD_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `SHOPD_BASE_URL` - Public URL for the service (OAuth callbacks derive from it)
//! - `GITHUB_CLIENT_ID` / `GITHUB_CLIENT_SECRET` - GitHub OAuth application
//! - `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET` - Google OAuth application
//!
//! ## Optional
//! - `SHOPD_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPD_PORT` - Listen port (default: 8080)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use shopd_core::AuthProvider;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Substrings that mark a secret as a copy-pasted placeholder (checked
/// case-insensitively).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Shopd application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the service
    pub base_url: String,
    /// GitHub OAuth application credentials
    pub github: OAuthProviderConfig,
    /// Google OAuth application credentials
    pub google: OAuthProviderConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// OAuth application credentials for one provider.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct OAuthProviderConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
}

impl std::fmt::Debug for OAuthProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthProviderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl OAuthProviderConfig {
    fn from_env(id_var: &str, secret_var: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: get_required_env(id_var)?,
            client_secret: get_validated_secret(secret_var)?,
        })
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SHOPD_DATABASE_URL")?;
        let host = get_env_or_default("SHOPD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SHOPD_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPD_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("SHOPD_BASE_URL")?;

        let github = OAuthProviderConfig::from_env("GITHUB_CLIENT_ID", "GITHUB_CLIENT_SECRET")?;
        let google = OAuthProviderConfig::from_env("GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET")?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            github,
            google,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// OAuth callback URL for a provider.
    ///
    /// Must match the redirect URL registered with the provider.
    #[must_use]
    pub fn callback_url(&self, provider: AuthProvider) -> String {
        format!(
            "{}/api/sessions/{}/callback",
            self.base_url.trim_end_matches('/'),
            provider
        )
    }
}

// =============================================================================
// Environment helpers
// =============================================================================

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// The app-specific variable wins; `DATABASE_URL` is the conventional fallback.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(primary_key.to_string()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Shannon entropy of the input, in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // secrets are far below f64 precision limits
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Reject placeholder-looking or low-entropy secrets at startup.
///
/// Real OAuth client secrets are random; anything that fails these checks is
/// almost certainly a value copied from provider setup docs.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            database_url: SecretString::from("postgres://localhost/shopd_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
            github: OAuthProviderConfig {
                client_id: "gh_client".to_string(),
                client_secret: SecretString::from("gh_client_secret_value"),
            },
            google: OAuthProviderConfig {
                client_id: "google_client".to_string(),
                client_secret: SecretString::from("google_client_secret_value"),
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn entropy_of_degenerate_inputs_is_zero() {
        assert!(shannon_entropy("").abs() < f64::EPSILON);
        assert!(shannon_entropy("aaaaaaa").abs() < f64::EPSILON);
    }

    #[test]
    fn entropy_of_uniform_pair_is_one_bit() {
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn placeholder_secrets_are_rejected() {
        let result = validate_secret_strength("your-client-secret-here", "GITHUB_CLIENT_SECRET");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn repetitive_secrets_are_rejected() {
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "GITHUB_CLIENT_SECRET").is_err());
    }

    #[test]
    fn random_looking_secrets_pass() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "GITHUB_CLIENT_SECRET").is_ok());
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn callback_url_per_provider() {
        let config = test_config();
        assert_eq!(
            config.callback_url(AuthProvider::GitHub),
            "http://localhost:8080/api/sessions/github/callback"
        );
        assert_eq!(
            config.callback_url(AuthProvider::Google),
            "http://localhost:8080/api/sessions/google/callback"
        );
    }

    #[test]
    fn callback_url_trims_trailing_slash() {
        let mut config = test_config();
        config.base_url = "http://localhost:8080/".to_string();
        assert_eq!(
            config.callback_url(AuthProvider::GitHub),
            "http://localhost:8080/api/sessions/github/callback"
        );
    }

    #[test]
    fn oauth_config_debug_redacts_secret() {
        let config = OAuthProviderConfig {
            client_id: "client_id_value".to_string(),
            client_secret: SecretString::from("super_secret_value"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("client_id_value"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_value"));
    }
}
