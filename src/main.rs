//! Redington Catalog - category tree service

use std::sync::Arc;
use anyhow::Result;
use redington_catalog::{api::{app_router, AppState}, publisher::EventPublisher, Config, PgCategoryRepository};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let db = PgPoolOptions::new().max_connections(config.max_connections).connect(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    let events = EventPublisher::connect(config.nats_url.as_deref()).await;
    let state = AppState::new(Arc::new(PgCategoryRepository::new(db)), events);

    let app = app_router(state);
    let addr = config.listen_addr();
    tracing::info!("🚀 Redington catalog listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
