use std::{net::SocketAddr, sync::Arc};

use axum::{ServiceExt, extract::Request};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use product_store_api::{
    app::build_app,
    config::{AppConfig, StoreBackend},
    db::{create_pool, orm_from_pool, run_migrations},
    repository::{InMemoryProductRepository, ProductRepository, SeaOrmProductRepository},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,product_store_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let products: Arc<dyn ProductRepository> = match config.store {
        StoreBackend::Postgres => {
            let pool = create_pool(config.require_database_url()?, config.max_connections).await?;
            run_migrations(&pool).await?;
            Arc::new(SeaOrmProductRepository::new(orm_from_pool(&pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory product store; data is lost on exit");
            Arc::new(InMemoryProductRepository::new())
        }
    };

    let app = build_app(AppState::new(products));

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        ServiceExt::<Request>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
