//! Database connection pool management
//!
//! The pool is created exactly once during startup, injected into
//! [`crate::PeekServer`], and closed exactly once after the transport
//! loop exits. There is no lazy global and no reconnect logic: a failed
//! connect is fatal for the process.

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::Executor;
use std::time::Duration;

use sqlpeek_core::{DbConfig, PeekError, Result};

/// Default maximum connections for the pool.
/// Kept low for single-agent tooling.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

fn connect_options(config: &DbConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database)
}

fn pool_options(max_connections: u32) -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        // Sessions run with autocommit disabled, matching the server's
        // read-oriented contract.
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET autocommit = 0").await?;
                Ok(())
            })
        })
}

/// Create the MySQL connection pool.
///
/// # Errors
///
/// Returns [`PeekError::Connection`] if the database is unreachable or
/// rejects the credentials. The failure is logged here and propagated;
/// callers are expected to treat it as fatal.
pub async fn connect(config: &DbConfig) -> Result<MySqlPool> {
    connect_with_options(config, DEFAULT_MAX_CONNECTIONS).await
}

/// Create the MySQL connection pool with a custom connection limit.
pub async fn connect_with_options(config: &DbConfig, max_connections: u32) -> Result<MySqlPool> {
    tracing::info!(target = %config.display_target(), "connecting to MySQL");

    let pool = pool_options(max_connections)
        .connect_with(connect_options(config))
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "failed to create database pool");
            PeekError::connection(err)
        })?;

    tracing::info!("database connection pool established");
    Ok(pool)
}

/// Create a pool without connecting.
///
/// Connections are only attempted on first acquire. Used by tests that
/// need a pool pointed at an unreachable server, and callers that want
/// startup to proceed before the database is up.
pub fn connect_lazy(config: &DbConfig) -> MySqlPool {
    pool_options(DEFAULT_MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(connect_options(config))
}

/// Close the pool, waiting for in-flight connections to drain.
///
/// Safe to call on a pool that never served a request.
pub async fn close(pool: &MySqlPool) {
    tracing::info!("closing database pool");
    pool.close().await;
    tracing::info!("database pool closed");
}
