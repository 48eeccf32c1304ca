use std::sync::Arc;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::core::config::{DatabaseConfig, StoreBackend, StoreConfig};
use crate::modules::document_store::{DocumentStore, MemoryDocumentStore, PostgresDocumentStore};

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// Build the configured document store, running migrations for Postgres
pub async fn connect_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
        StoreBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("Postgres backend requires DATABASE_URL"))?;

            let pool = create_pool(database).await?;
            tracing::info!("Database connection pool created");

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Database migrations completed successfully");

            Ok(Arc::new(PostgresDocumentStore::new(pool)))
        }
    }
}
