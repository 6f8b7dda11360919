use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{dto::products::ProductUpdate, models::Product, repository::ProductRepository};

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: Product) -> Result<Product, DbErr> {
        let mut products = self.products.write().await;
        if products.iter().any(|p| p.id == product.id) {
            return Err(DbErr::Custom(format!(
                "duplicate key value violates unique constraint: id={}",
                product.id
            )));
        }
        products.push(product.clone());
        Ok(product)
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<Product>, DbErr> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, DbErr> {
        let mut items = self.products.read().await.clone();
        // Stable: equal timestamps keep insertion order.
        items.sort_by_key(|p| p.created_at);
        Ok(items)
    }

    async fn update_one(
        &self,
        id: Uuid,
        patch: ProductUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Product>, DbErr> {
        let mut products = self.products.write().await;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.apply(patch, updated_at);
        Ok(Some(product.clone()))
    }

    async fn delete_one(&self, id: Uuid) -> Result<bool, DbErr> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}
