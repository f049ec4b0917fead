//! User domain types.
//!
//! These types represent validated domain objects separate from database row
//! types. The password hash deliberately never appears on [`User`]; the
//! repository exposes it only through its dedicated credential lookup.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopd_core::{AuthProvider, CartId, Email, UserId};

/// A shopd account (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login key, unique across accounts.
    pub email: Email,
    /// First name from registration or the OAuth profile.
    pub first_name: String,
    /// Last name from registration or the OAuth profile.
    pub last_name: String,
    /// Age in years. OAuth accounts default to 18.
    pub age: i32,
    /// How the account was created.
    pub provider: AuthProvider,
    /// The cart owned by this user.
    pub cart_id: CartId,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a user row.
///
/// The cart is not part of this struct; the repository creates it in the same
/// transaction and wires up `cart_id` itself.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    /// Argon2 PHC string, already hashed by the auth service.
    pub password_hash: String,
    pub provider: AuthProvider,
}
