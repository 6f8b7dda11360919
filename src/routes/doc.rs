use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::products::{ProductIn, ProductOut, ProductUpdate, ProductUpdateOut},
    response::ErrorResponse,
    routes::{health, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::create_product,
        products::get_product,
        products::list_products,
        products::update_product,
        products::delete_product,
    ),
    components(
        schemas(
            health::HealthData,
            ProductIn,
            ProductOut,
            ProductUpdate,
            ProductUpdateOut,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
