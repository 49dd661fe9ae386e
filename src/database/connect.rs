use log::info;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, Pool, Postgres};

use crate::config::Config;
use crate::error::{ApiError, QueryError};

pub async fn connect(config: &Config) -> Result<Pool<Postgres>, sqlx::Error> {
    info!("connecting to {}", config.masked_database_url());

    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(&config.database_url())
        .await?;

    info!("connected to postgres");
    Ok(pool)
}

/// Applies the DDL script as one raw batch. The schema is written with
/// IF NOT EXISTS guards, so re-running it on every start is harmless.
pub async fn apply_schema(path: &str, pool: &Pool<Postgres>) -> Result<(), ApiError> {
    let ddl = std::fs::read_to_string(path)
        .map_err(|e| ApiError::Storage(format!("failed to read schema file {path}: {e}")))?;

    pool.execute(ddl.as_str())
        .await
        .map_err(|e| QueryError::from(e).into())?;

    info!("schema applied from {path}");
    Ok(())
}
