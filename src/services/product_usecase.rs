use std::sync::Arc;

use axum::extract::FromRef;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::products::{ProductIn, ProductOut, ProductUpdate, ProductUpdateOut},
    error::{AppError, AppResult},
    models::Product,
    repository::ProductRepository,
    state::AppState,
};

/// Business rules for the product resource, independent of HTTP.
///
/// Cheap to construct: handlers get a fresh one per request through
/// `State<ProductUsecase>`.
#[derive(Clone)]
pub struct ProductUsecase {
    repository: Arc<dyn ProductRepository>,
}

impl FromRef<AppState> for ProductUsecase {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.products.clone())
    }
}

impl ProductUsecase {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: ProductIn) -> AppResult<ProductOut> {
        validate_name(&input.name)?;
        validate_quantity(input.quantity)?;
        validate_price(input.price)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: input.name,
            quantity: input.quantity,
            price: input.price,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        let product = self.repository.insert(product).await?;

        tracing::info!(product_id = %product.id, "product created");
        Ok(product.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> AppResult<ProductOut> {
        match self.repository.find_one(id).await? {
            Some(product) => Ok(product.into()),
            None => Err(not_found(id)),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn query(&self) -> AppResult<Vec<ProductOut>> {
        let items = self.repository.find_all().await?;
        Ok(items.into_iter().map(ProductOut::from).collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: Uuid, patch: ProductUpdate) -> AppResult<ProductUpdateOut> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(quantity) = patch.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
        }
        if patch.is_empty() {
            tracing::debug!(product_id = %id, "empty patch, only updated_at changes");
        }

        match self.repository.update_one(id, patch, Utc::now()).await? {
            Some(product) => {
                tracing::info!(product_id = %id, "product updated");
                Ok(product.into())
            }
            None => Err(not_found(id)),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repository.delete_one(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Product not found: {id}"))
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be blank".into()));
    }
    Ok(())
}

fn validate_quantity(quantity: i32) -> AppResult<()> {
    if quantity < 0 {
        return Err(AppError::Validation("quantity must not be negative".into()));
    }
    Ok(())
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::Validation(
            "price must be a non-negative number".into(),
        ));
    }
    Ok(())
}
