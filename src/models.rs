use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::dto::products::ProductUpdate;

/// A product as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Copy the fields present in `patch` onto this record. `id` and `created_at` never change.
    pub fn apply(&mut self, patch: ProductUpdate, updated_at: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = updated_at;
    }
}
