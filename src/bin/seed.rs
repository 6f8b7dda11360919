use std::sync::Arc;

use product_store_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    dto::products::ProductIn,
    repository::SeaOrmProductRepository,
    services::ProductUsecase,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(config.require_database_url()?, config.max_connections).await?;
    run_migrations(&pool).await?;

    let usecase = ProductUsecase::new(Arc::new(SeaOrmProductRepository::new(orm_from_pool(&pool))));
    let existing = usecase.query().await?;

    let samples = [
        ("Widget", 10, 9.99),
        ("Gadget", 25, 19.5),
        ("Gizmo", 0, 4.25),
    ];
    let mut created = 0;
    for (name, quantity, price) in samples {
        if existing.iter().any(|p| p.name == name) {
            continue;
        }
        usecase
            .create(ProductIn {
                name: name.to_string(),
                quantity,
                price,
                status: true,
            })
            .await?;
        created += 1;
    }

    println!("Seed completed. Created {created} products");
    Ok(())
}
