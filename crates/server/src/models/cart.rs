//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopd_core::CartId;

/// A shopping cart (domain type).
///
/// Carts are created empty alongside their owning user. Item management is
/// handled by the cart endpoints of the wider shop service, not by this crate.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Line items in the cart.
    pub items: Vec<CartItem>,
    /// Total quantity across all line items.
    pub quantity: i32,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A single line item stored in the cart's `items` JSONB column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    /// Product identifier in the catalog.
    pub product_id: String,
    /// Quantity of this product.
    pub quantity: i32,
}
