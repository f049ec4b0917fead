//! Authentication service.
//!
//! Implements the account flows behind the session routes: local
//! registration and login, OAuth sign-in, and session re-hydration. Password
//! hashing uses Argon2id; the OAuth handshake itself lives in [`crate::oauth`].

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use shopd_core::{AuthProvider, Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::{NewUser, User};
use crate::oauth::OAuthProfile;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Default age recorded for accounts created through an OAuth provider,
/// whose profiles carry no age field.
const OAUTH_DEFAULT_AGE: i32 = 18;

/// Profile fields accepted by [`AuthService::register`].
#[derive(Debug, Clone)]
pub struct Registration<'r> {
    pub email: &'r str,
    pub password: &'r str,
    pub first_name: &'r str,
    pub last_name: &'r str,
    pub age: i32,
}

/// Authentication service.
///
/// Handles registration, login, OAuth sign-in, and session re-hydration.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with email and password.
    ///
    /// The user's cart is created in the same transaction as the user row.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(&self, registration: Registration<'_>) -> Result<User, AuthError> {
        let email = Email::parse(registration.email)?;
        validate_password(registration.password)?;

        let password_hash = hash_password(registration.password)?;

        let user = self
            .users
            .create(&NewUser {
                email,
                first_name: registration.first_name.to_owned(),
                last_name: registration.last_name.to_owned(),
                age: registration.age,
                password_hash,
                provider: AuthProvider::Local,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account exists for the email.
    /// Returns `AuthError::IncorrectPassword` if the hash comparison fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .find_with_password_hash(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Sign in with an OAuth provider profile, creating the account on first
    /// login.
    ///
    /// New OAuth accounts get a cart, a default age, and a placeholder
    /// password (the provider name, hashed) so the row satisfies the same
    /// schema as local accounts. A concurrent first login for the same email
    /// loses the insert race and falls back to the existing row.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the datastore fails.
    pub async fn login_with_provider(&self, profile: &OAuthProfile) -> Result<User, AuthError> {
        if let Some(user) = self.users.find_by_email(&profile.email).await? {
            return Ok(user);
        }

        let password_hash = hash_password(profile.provider.as_str())?;
        let created = self
            .users
            .create(&NewUser {
                email: profile.email.clone(),
                first_name: profile.first_name.clone(),
                last_name: profile.last_name.clone(),
                age: OAUTH_DEFAULT_AGE,
                password_hash,
                provider: profile.provider,
            })
            .await;

        match created {
            Ok(user) => {
                tracing::info!(user_id = %user.id, provider = %profile.provider, "oauth user created");
                Ok(user)
            }
            // Lost a concurrent-registration race; the row exists now.
            Err(RepositoryError::Conflict(_)) => self
                .users
                .find_by_email(&profile.email)
                .await?
                .ok_or(AuthError::UserNotFound),
            Err(other) => Err(AuthError::Repository(other)),
        }
    }

    /// Re-hydrate the full user record for a session-stored ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn user_for_session(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::IncorrectPassword)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::IncorrectPassword)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::IncorrectPassword)
        ));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same input").unwrap();
        let second = hash_password("same input").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::IncorrectPassword)
        ));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }
}
