//! Server runtime: speak MCP over a transport until the client goes away,
//! then close the pool.
//!
//! Two transports:
//! - stdio, for servers launched as a child process of the agent
//! - SSE, for servers reached over the network
//!
//! Both paths own the shutdown sequence: the pool's close is awaited
//! exactly once after the transport loop exits, draining in-flight
//! connections before the process is considered done.

use std::net::SocketAddr;

use anyhow::Result;
use rmcp::transport::sse_server::SseServer;
use rmcp::{transport::stdio, ServiceExt};
use sqlx::MySqlPool;

use crate::db;
use crate::tools::PeekServer;

/// Server configuration for the SSE transport.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Address to bind to (default: 0.0.0.0:3002)
    pub bind_addr: SocketAddr,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3002)),
        }
    }
}

/// Serve MCP over stdio until the client disconnects.
pub async fn run_stdio(pool: MySqlPool) -> Result<()> {
    tracing::info!("MCP server ready on stdio");

    let service = PeekServer::new(pool.clone())
        .serve(stdio())
        .await
        .inspect_err(|err| tracing::error!(error = %err, "serving error"))?;
    service.waiting().await?;

    db::close(&pool).await;
    tracing::info!("server shutdown complete");
    Ok(())
}

/// Serve MCP over SSE until Ctrl+C/SIGTERM.
pub async fn run_sse(pool: MySqlPool, config: ServeConfig) -> Result<()> {
    let ct = SseServer::serve(config.bind_addr).await?.with_service({
        let pool = pool.clone();
        move || PeekServer::new(pool.clone())
    });
    tracing::info!(addr = %config.bind_addr, "MCP server listening (SSE)");

    shutdown_signal().await;
    ct.cancel();

    db::close(&pool).await;
    tracing::info!("server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}
