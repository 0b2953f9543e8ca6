//! Database Connection Cache - Host Entry Point
//!
//! Loads the database configuration, builds the pool and checks that a
//! connection can be acquired, reused and released.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use db_connection_cache::infrastructure::driven_adapters::config;
use db_connection_cache::infrastructure::driven_adapters::{builtin_registry, PostgresConnection};
use db_connection_cache::ConnectionPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "db_connection_cache=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build the pool from the process-wide configuration
    let registry = builtin_registry();
    let pool = ConnectionPool::new(config::global(), &registry)?;
    tracing::info!(driver = pool.driver(), max_connections = pool.max_connections(), "Connection pool ready");

    let mut connection = pool.acquire().await?;
    if let Some(pg) = connection.downcast_mut::<PostgresConnection>() {
        let (value,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(pg.executor().await?).await?;
        tracing::info!(value, "Database answered");
    }
    let first_id = connection.id();
    pool.release(Some(connection)).await;

    let mut connection = pool.acquire().await?;
    tracing::info!(reused = connection.id() == first_id, "Second acquisition");

    if let Some(pg) = connection.downcast_mut::<PostgresConnection>() {
        pg.close().await?;
    }
    pool.release(Some(connection)).await;
    tracing::info!(idle = pool.idle_count().await, "Done");

    Ok(())
}
