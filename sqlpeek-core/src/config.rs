//! Database configuration for the sqlpeek server.
//!
//! Settings come from `MYSQL_DATABASE_*` environment variables (usually via
//! a `.env` file loaded by the CLI) or are assembled directly by the caller.
//! The server crate turns a `DbConfig` into driver connect options; this
//! crate stays driver-agnostic.

use std::env;
use std::fmt;

use crate::error::{PeekError, Result};

/// Default MySQL port when `MYSQL_DATABASE_PORT` is not set.
pub const DEFAULT_PORT: u16 = 3306;

/// Connection settings for the inspected MySQL database.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl DbConfig {
    /// Load configuration from `MYSQL_DATABASE_*` environment variables.
    ///
    /// Host, user, and database name are required; the port defaults to
    /// 3306 and the password to empty (passwordless login).
    pub fn from_env() -> Result<Self> {
        let host = require_env("MYSQL_DATABASE_HOST")?;
        let user = require_env("MYSQL_DATABASE_USER")?;
        let database = require_env("MYSQL_DATABASE_NAME")?;
        let password = env::var("MYSQL_DATABASE_PASSWORD").unwrap_or_default();
        let port = match env::var("MYSQL_DATABASE_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                PeekError::config(format!("MYSQL_DATABASE_PORT is not a valid port: {raw:?}"))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            host,
            port,
            user,
            password,
            database,
        })
    }

    /// Connection target without credentials, for log lines.
    pub fn display_target(&self) -> String {
        format!("mysql://{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

fn require_env(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(PeekError::config(format!("{key} not set"))),
    }
}

// Manual Debug so the password never lands in logs or error chains.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}
