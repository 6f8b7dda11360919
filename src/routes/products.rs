use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{ProductIn, ProductOut, ProductUpdate, ProductUpdateOut},
    error::AppResult,
    extract::{JsonBody, ProductId},
    response::ErrorResponse,
    services::ProductUsecase,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductIn,
    responses(
        (status = 201, description = "Product created", body = ProductOut),
        (status = 400, description = "Invalid product payload", body = ErrorResponse),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(usecase): State<ProductUsecase>,
    JsonBody(body): JsonBody<ProductIn>,
) -> AppResult<(StatusCode, Json<ProductOut>)> {
    let product = usecase.create(body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID (UUID v4)")
    ),
    responses(
        (status = 200, description = "Get product", body = ProductOut),
        (status = 400, description = "Malformed product id", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(usecase): State<ProductUsecase>,
    ProductId(id): ProductId,
) -> AppResult<Json<ProductOut>> {
    Ok(Json(usecase.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "List products, oldest first", body = [ProductOut])
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(usecase): State<ProductUsecase>,
) -> AppResult<Json<Vec<ProductOut>>> {
    Ok(Json(usecase.query().await?))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID (UUID v4)")
    ),
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "Updated product", body = ProductUpdateOut),
        (status = 400, description = "Invalid product payload", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(usecase): State<ProductUsecase>,
    ProductId(id): ProductId,
    JsonBody(body): JsonBody<ProductUpdate>,
) -> AppResult<Json<ProductUpdateOut>> {
    Ok(Json(usecase.update(id, body).await?))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID (UUID v4)")
    ),
    responses(
        (status = 204, description = "Deleted product"),
        (status = 400, description = "Malformed product id", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(usecase): State<ProductUsecase>,
    ProductId(id): ProductId,
) -> AppResult<StatusCode> {
    usecase.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use chrono::Utc;
    use sea_orm::DbErr;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{models::Product, repository::MockProductRepository};

    fn app(repo: MockProductRepository) -> Router {
        Router::new()
            .nest("/products", router())
            .with_state(AppState::new(Arc::new(repo)))
    }

    fn strict_mock() -> MockProductRepository {
        let mut repo = MockProductRepository::new();
        repo.expect_insert().never();
        repo.expect_find_one().never();
        repo.expect_find_all().never();
        repo.expect_update_one().never();
        repo.expect_delete_one().never();
        repo
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn widget(id: Uuid) -> Product {
        let now = Utc::now();
        Product {
            id,
            name: "Widget".into(),
            quantity: 10,
            price: 9.99,
            status: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn malformed_ids_never_reach_the_store() {
        for method in ["GET", "PATCH", "DELETE"] {
            let request = Request::builder()
                .method(method)
                .uri("/products/not-a-uuid")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap();

            let response = app(strict_mock()).oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method}");
            assert!(json_body(response).await["detail"].is_string(), "{method}");
        }
    }

    #[tokio::test]
    async fn non_v4_uuids_never_reach_the_store() {
        let time_based = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";
        let nil = Uuid::nil().to_string();

        for id in [time_based, nil.as_str()] {
            for method in ["GET", "PATCH", "DELETE"] {
                let request = Request::builder()
                    .method(method)
                    .uri(format!("/products/{id}"))
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "quantity": 1 }).to_string()))
                    .unwrap();

                let response = app(strict_mock()).oneshot(request).await.unwrap();
                assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method} {id}");
                let body = json_body(response).await;
                assert!(
                    body["detail"].as_str().is_some_and(|d| d.contains(id)),
                    "{method} {id}: {body}"
                );
            }
        }
    }

    #[tokio::test]
    async fn broken_json_gets_a_json_detail() {
        let request = Request::builder()
            .method("POST")
            .uri("/products")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "Widget", "#))
            .unwrap();
        let response = app(strict_mock()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        assert!(json_body(response).await["detail"].is_string());
    }

    #[tokio::test]
    async fn out_of_range_quantity_gets_a_json_detail() {
        let request = Request::builder()
            .method("POST")
            .uri("/products")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "name": "Widget", "price": 1.0, "quantity": 4_294_967_296_i64 }).to_string(),
            ))
            .unwrap();
        let response = app(strict_mock()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json_body(response).await["detail"].is_string());
    }

    #[tokio::test]
    async fn get_missing_product_returns_404_with_detail() {
        let id = Uuid::new_v4();
        let mut repo = MockProductRepository::new();
        repo.expect_find_one()
            .once()
            .withf(move |i| *i == id)
            .return_once(|_| Ok(None));

        let request = Request::builder()
            .uri(format!("/products/{id}"))
            .body(Body::empty())
            .unwrap();
        let response = app(repo).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({ "detail": format!("Product not found: {id}") })
        );
    }

    #[tokio::test]
    async fn create_returns_201() {
        let mut repo = MockProductRepository::new();
        repo.expect_insert().once().returning(Ok);

        let request = Request::builder()
            .method("POST")
            .uri("/products")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "name": "Widget", "price": 9.99, "quantity": 10 }).to_string(),
            ))
            .unwrap();
        let response = app(repo).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["name"], "Widget");
        assert_eq!(body["quantity"], 10);
        assert!(body["id"].as_str().is_some());
    }

    #[tokio::test]
    async fn update_missing_product_returns_404() {
        let mut repo = MockProductRepository::new();
        repo.expect_update_one()
            .once()
            .return_once(|_, _, _| Ok(None));

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/products/{}", Uuid::new_v4()))
            .header("content-type", "application/json")
            .body(Body::from(json!({ "price": 12.5 }).to_string()))
            .unwrap();
        let response = app(repo).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_with_null_field_is_rejected_before_the_store() {
        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/products/{}", Uuid::new_v4()))
            .header("content-type", "application/json")
            .body(Body::from(json!({ "name": null }).to_string()))
            .unwrap();
        let response = app(strict_mock()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json_body(response).await["detail"].is_string());
    }

    #[tokio::test]
    async fn delete_returns_204_with_empty_body() {
        let id = Uuid::new_v4();
        let mut repo = MockProductRepository::new();
        repo.expect_delete_one()
            .once()
            .withf(move |i| *i == id)
            .return_once(|_| Ok(true));

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/products/{id}"))
            .body(Body::empty())
            .unwrap();
        let response = app(repo).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn get_returns_product() {
        let id = Uuid::new_v4();
        let product = widget(id);
        let mut repo = MockProductRepository::new();
        repo.expect_find_one()
            .once()
            .return_once(move |_| Ok(Some(product)));

        let request = Request::builder()
            .uri(format!("/products/{id}"))
            .body(Body::empty())
            .unwrap();
        let response = app(repo).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: ProductOut = serde_json::from_value(json_body(response).await).unwrap();
        assert_eq!(body.id, id);
    }

    #[tokio::test]
    async fn store_failure_on_list_is_500() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_all()
            .once()
            .return_once(|| Err(DbErr::Custom("connection refused".into())));

        let request = Request::builder()
            .uri("/products")
            .body(Body::empty())
            .unwrap();
        let response = app(repo).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
