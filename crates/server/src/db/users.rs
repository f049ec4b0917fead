//! User repository for database operations.
//!
//! Queries use runtime-checked `query_as` with explicit row structs; domain
//! conversion happens in one place so invalid stored data is reported as
//! `DataCorruption` rather than leaking raw strings into the service layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopd_core::{AuthProvider, CartId, Email, UserId};

use super::carts::CartRepository;
use super::{RepositoryError, conflict_on_unique};
use crate::models::{NewUser, User};

/// Row shape shared by all user queries. The password hash is selected
/// separately and only where the login flow needs it.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
    age: i32,
    provider: String,
    cart_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let provider = AuthProvider::from_str_opt(&row.provider).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown provider: {}", row.provider))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            first_name: row.first_name,
            last_name: row.last_name,
            age: row.age,
            provider,
            cart_id: CartId::new(row.cart_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// User row plus the password hash, for the login flow.
#[derive(sqlx::FromRow)]
struct CredentialRow {
    password_hash: String,
    #[sqlx(flatten)]
    user: UserRow,
}

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, age, provider, cart_id, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM shop_user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM shop_user WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user together with their password hash, by email.
    ///
    /// Returns `None` if no user exists with that email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn find_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT password_hash, {USER_COLUMNS} FROM shop_user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some((User::try_from(row.user)?, row.password_hash)))
    }

    /// Create a user and their cart in a single transaction.
    ///
    /// The cart insert and the user insert commit together; a duplicate email
    /// rolls both back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart = CartRepository::create_in(&mut tx).await?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            INSERT INTO shop_user (email, first_name, last_name, age, password_hash, provider, cart_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(new_user.email.as_str())
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(new_user.age)
        .bind(&new_user.password_hash)
        .bind(new_user.provider.as_str())
        .bind(cart.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        let user = User::try_from(row)?;

        tx.commit().await?;

        Ok(user)
    }
}
