//! Connection provider for the recipes database.
//!
//! A pool is built once from a [`DatabaseConfig`]. Each request then takes exactly one session
//! from it with [`acquire`]; the session goes back to the pool when the returned guard drops,
//! whether the request succeeded or not.

use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres};

use crate::config::DatabaseConfig;
use crate::errors::StoreError;

/// How long a request waits for a free session before giving up.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// A database session scoped to one request.
pub type Session = PoolConnection<Postgres>;

fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.schema)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Builds a pool and opens its first session to verify the credentials.
///
/// # Returns
/// * `Ok(PgPool)` - The database is reachable
/// * `Err(StoreError::Connection)` - The server is unreachable or rejected the credentials
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let pool = pool_options(config)
        .connect_with(connect_options(config))
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        schema = %config.schema,
        max_connections = config.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Builds a pool without opening any session; the first [`acquire`] connects.
pub fn connect_lazy(config: &DatabaseConfig) -> PgPool {
    pool_options(config).connect_lazy_with(connect_options(config))
}

/// Acquires one session from the pool and logs its backend process id.
pub async fn acquire(pool: &PgPool) -> Result<Session, StoreError> {
    let mut session = pool
        .acquire()
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))?;
    let backend_pid: i32 = sqlx::query_scalar("SELECT pg_backend_pid()")
        .fetch_one(&mut *session)
        .await?;
    tracing::info!(session = backend_pid, "database session established");
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> DatabaseConfig {
        DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            user: "chef".to_string(),
            password: "secreto".to_string(),
            schema: "cocina".to_string(),
            max_connections: 1,
        }
    }

    #[tokio::test]
    async fn connect_to_unreachable_server_is_a_connection_error() {
        let result = connect(&unreachable_config()).await;
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }

    #[tokio::test]
    async fn lazy_pool_fails_on_first_acquire() {
        let pool = connect_lazy(&unreachable_config());
        let result = acquire(&pool).await;
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }

    #[tokio::test]
    async fn acquire_reports_a_live_session() {
        let Some(pool) = crate::sql::tests::setup_test_db().await else {
            return;
        };
        let mut session = acquire(&pool).await.unwrap();
        let one: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&mut *session)
            .await
            .unwrap();
        assert_eq!(one, 1);
    }
}
