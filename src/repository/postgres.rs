use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    db::OrmConn,
    dto::products::ProductUpdate,
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    models::Product,
    repository::ProductRepository,
};

#[derive(Debug, Clone)]
pub struct SeaOrmProductRepository {
    orm: OrmConn,
}

impl SeaOrmProductRepository {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn insert(&self, product: Product) -> Result<Product, DbErr> {
        let active = ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            quantity: Set(product.quantity),
            price: Set(product.price),
            status: Set(product.status),
            created_at: Set(product.created_at.into()),
            updated_at: Set(product.updated_at.into()),
        };
        let model = active.insert(&self.orm).await?;
        Ok(product_from_entity(model))
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<Product>, DbErr> {
        let model = Products::find_by_id(id).one(&self.orm).await?;
        Ok(model.map(product_from_entity))
    }

    async fn find_all(&self) -> Result<Vec<Product>, DbErr> {
        let items = Products::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(items)
    }

    async fn update_one(
        &self,
        id: Uuid,
        patch: ProductUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Product>, DbErr> {
        // One UPDATE .. RETURNING statement, so the merge is atomic per row.
        let mut update = Products::update_many()
            .col_expr(
                Column::UpdatedAt,
                Expr::value(DateTime::<FixedOffset>::from(updated_at)),
            )
            .filter(Column::Id.eq(id));
        if let Some(name) = patch.name {
            update = update.col_expr(Column::Name, Expr::value(name));
        }
        if let Some(quantity) = patch.quantity {
            update = update.col_expr(Column::Quantity, Expr::value(quantity));
        }
        if let Some(price) = patch.price {
            update = update.col_expr(Column::Price, Expr::value(price));
        }
        if let Some(status) = patch.status {
            update = update.col_expr(Column::Status, Expr::value(status));
        }

        let updated = update.exec_with_returning(&self.orm).await?;
        Ok(updated.into_iter().next().map(product_from_entity))
    }

    async fn delete_one(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = Products::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        quantity: model.quantity,
        price: model.price,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
