//! Cart repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use sqlx::types::Json;

use shopd_core::CartId;

use super::RepositoryError;
use crate::models::{Cart, CartItem};

/// Row shape shared by all cart queries.
#[derive(sqlx::FromRow)]
struct CartRow {
    id: i64,
    items: Json<Vec<CartItem>>,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.id),
            items: row.items.0,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for cart database operations.
///
/// Cart contents are managed by the wider shop service; this crate only
/// creates the empty cart that registration attaches to a new user.
pub struct CartRepository;

impl CartRepository {
    /// Insert an empty cart on an existing connection or transaction.
    ///
    /// User creation runs this inside the same transaction as the user
    /// insert, so a failed registration never leaves an orphaned cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_in(conn: &mut PgConnection) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO cart (items, quantity)
            VALUES ('[]', 0)
            RETURNING id, items, quantity, created_at, updated_at
            ",
        )
        .fetch_one(conn)
        .await?;

        Ok(row.into())
    }
}
