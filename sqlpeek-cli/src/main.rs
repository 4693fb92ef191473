//! sqlpeek - read-oriented MySQL inspection over the Model Context Protocol
//!
//! The binary does the process bootstrap the server core stays out of:
//! load `.env`, initialize tracing, read the database configuration,
//! connect the pool, and hand it to the chosen transport. If the pool
//! cannot be created the process exits nonzero without serving traffic.

use std::net::SocketAddr;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use sqlpeek_core::{config::DEFAULT_PORT, DbConfig};
use sqlpeek_server::{db, run_sse, run_stdio, ServeConfig};

#[derive(Parser, Debug)]
#[command(
    name = "sqlpeek",
    author,
    version,
    about = "MCP server exposing read-oriented MySQL inspection tools",
    long_about = "Serve six database inspection tools (health check, list tables, \
                  describe schema, run a query, list indexes, explain a query) to a \
                  calling agent over MCP, brokered through one shared connection pool."
)]
struct Cli {
    /// Transport to speak MCP over
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Address to bind the SSE transport to
    #[arg(long, default_value = "0.0.0.0:3002")]
    bind: SocketAddr,

    /// MySQL server host
    #[arg(long, env = "MYSQL_DATABASE_HOST")]
    host: Option<String>,

    /// MySQL server port
    #[arg(long, env = "MYSQL_DATABASE_PORT")]
    port: Option<u16>,

    /// MySQL user
    #[arg(long, env = "MYSQL_DATABASE_USER")]
    user: Option<String>,

    /// MySQL password (empty for passwordless login)
    #[arg(long, env = "MYSQL_DATABASE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Database name to inspect
    #[arg(long, env = "MYSQL_DATABASE_NAME")]
    database: Option<String>,

    /// Enable debug logging (unless RUST_LOG is set explicitly)
    #[arg(long)]
    debug: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Transport {
    Stdio,
    Sse,
}

impl Cli {
    fn db_config(&self) -> Result<DbConfig> {
        Ok(DbConfig {
            host: self.host.clone().ok_or_else(|| missing("host"))?,
            port: self.port.unwrap_or(DEFAULT_PORT),
            user: self.user.clone().ok_or_else(|| missing("user"))?,
            password: self.password.clone().unwrap_or_default(),
            database: self.database.clone().ok_or_else(|| missing("database"))?,
        })
    }
}

fn missing(flag: &str) -> anyhow::Error {
    anyhow!("--{flag} not set (or its MYSQL_DATABASE_* environment variable)")
}

fn init_tracing(debug: bool) -> Result<()> {
    let default_filter = if debug { "debug" } else { "info" };
    // Logs go to stderr: on the stdio transport, stdout is the protocol
    // channel.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let config = cli.db_config()?;
    tracing::info!(target = %config.display_target(), "starting sqlpeek");

    let pool = db::connect(&config)
        .await
        .context("failed to create database pool")?;

    match cli.transport {
        Transport::Stdio => run_stdio(pool).await?,
        Transport::Sse => run_sse(pool, ServeConfig { bind_addr: cli.bind }).await?,
    }

    Ok(())
}
