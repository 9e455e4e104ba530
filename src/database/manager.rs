use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{Executor, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

const SCHEMA: &str = include_str!("../../sql/schema.sql");

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DatabaseError::Conflict("Record already exists".to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                DatabaseError::NotFound("Referenced record not found".to_string())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, DatabaseError> {
    if config.url.is_empty() {
        return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
    }

    let options = PgConnectOptions::from_str(&config.url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    Ok(if config.require_ssl {
        options.ssl_mode(PgSslMode::Require)
    } else {
        options
    })
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
}

/// Open the pool and verify connectivity.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let pool = pool_options(config).connect_with(connect_options(config)?).await?;
    info!("Connected to database");
    Ok(pool)
}

/// Build the pool without touching the network until the first query.
pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    Ok(pool_options(config).connect_lazy_with(connect_options(config)?))
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the bundled schema (idempotent `CREATE TABLE IF NOT EXISTS`).
pub async fn init_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    pool.execute(SCHEMA).await?;
    info!("Database schema created successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: 1,
            connection_timeout: 1,
            require_ssl: false,
        }
    }

    #[test]
    fn rejects_empty_url() {
        assert!(matches!(
            connect_options(&config("")),
            Err(DatabaseError::ConfigMissing("DATABASE_URL"))
        ));
    }

    #[test]
    fn rejects_malformed_url() {
        assert!(matches!(
            connect_options(&config("not a url")),
            Err(DatabaseError::InvalidDatabaseUrl)
        ));
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            DatabaseError::from(sqlx::Error::RowNotFound),
            DatabaseError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn lazy_pool_does_not_connect() {
        let pool = connect_lazy(&config("postgres://localhost:1/ahiska_test")).unwrap();
        assert_eq!(pool.size(), 0);
    }
}
