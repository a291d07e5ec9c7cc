/// Product model
///
/// Every product belongs to exactly one seller account and is removed together
/// with it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE products (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     description TEXT NOT NULL,
///     price NUMERIC(10, 2) NOT NULL,
///     quantity INTEGER NOT NULL CHECK (quantity >= 0),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     seller_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Product listed by a seller
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID (UUID v4)
    pub id: Uuid,

    pub description: String,

    /// Unit price, two decimal places
    pub price: Decimal,

    /// Units in stock, never negative
    pub quantity: i32,

    pub is_active: bool,

    /// Owning seller account
    pub seller_id: Uuid,

    /// Insertion time, used for stable list ordering only
    pub created_at: DateTime<Utc>,
}

/// Input for creating a product
///
/// `seller_id` always comes from the authenticated requester, never from the
/// request body.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub description: String,
    pub price: Decimal,
    pub quantity: i32,
    pub is_active: bool,
    pub seller_id: Uuid,
}

/// Fields a seller may change on an existing product
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub is_active: Option<bool>,
}

impl Product {
    /// Builds a new product with a fresh ID
    pub fn new(data: NewProduct) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: data.description,
            price: data.price,
            quantity: data.quantity,
            is_active: data.is_active,
            seller_id: data.seller_id,
            created_at: Utc::now(),
        }
    }

    /// Applies the `Some` fields of `changes`; the seller never changes
    pub fn apply(&mut self, changes: ProductChanges) {
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
    }
}
