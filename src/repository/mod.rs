//! The product store: the only place the API touches persistent state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use sea_orm::DbErr;
use uuid::Uuid;

use crate::{dto::products::ProductUpdate, models::Product};

mod memory;
mod postgres;

pub use memory::InMemoryProductRepository;
pub use postgres::SeaOrmProductRepository;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new record and return it as stored.
    async fn insert(&self, product: Product) -> Result<Product, DbErr>;

    async fn find_one(&self, id: Uuid) -> Result<Option<Product>, DbErr>;

    /// All records, oldest first.
    async fn find_all(&self) -> Result<Vec<Product>, DbErr>;

    /// Merge the present fields of `patch` into the record. `None` when no record has `id`.
    async fn update_one(
        &self,
        id: Uuid,
        patch: ProductUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Product>, DbErr>;

    /// Returns whether a record was removed.
    async fn delete_one(&self, id: Uuid) -> Result<bool, DbErr>;
}
