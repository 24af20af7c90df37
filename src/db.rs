use std::time::Duration;

use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::{config::AppConfig, error::AppResult};

pub type DbPool = PgPool;

/// Create the Postgres pool every repository call checks connections out of.
pub async fn create_pool(config: &AppConfig) -> AppResult<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect(&config.database_url)
        .await?;
    tracing::info!(
        max_connections = config.db_max_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Wrap the pool in a SeaORM connection.
pub fn create_orm_conn(pool: DbPool) -> DatabaseConnection {
    SqlxPostgresConnector::from_sqlx_postgres_pool(pool)
}
