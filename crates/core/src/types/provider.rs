//! Authentication provider enum.

use core::fmt;

use serde::{Deserialize, Serialize};

/// How an account was created.
///
/// Stored as lowercase text in the `provider` column. OAuth accounts also use
/// the provider name as the seed for their placeholder password hash, so a
/// provider's `as_str` value is part of the persisted data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Email + password registration.
    Local,
    /// GitHub OAuth.
    GitHub,
    /// Google OAuth.
    Google,
}

impl AuthProvider {
    /// Lowercase name used in the database and in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::GitHub => "github",
            Self::Google => "google",
        }
    }

    /// Parse the lowercase database representation.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "local" => Some(Self::Local),
            "github" => Some(Self::GitHub),
            "google" => Some(Self::Google),
            _ => None,
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn as_str_round_trips() {
        for provider in [AuthProvider::Local, AuthProvider::GitHub, AuthProvider::Google] {
            assert_eq!(AuthProvider::from_str_opt(provider.as_str()), Some(provider));
        }
        assert_eq!(AuthProvider::from_str_opt("facebook"), None);
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(
            serde_json::to_string(&AuthProvider::GitHub).unwrap(),
            "\"github\""
        );
    }
}
