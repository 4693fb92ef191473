//! sqlpeek-core: configuration and error types shared across the sqlpeek
//! workspace.
//!
//! The server crate owns the connection pool and the tool handlers; this
//! crate holds the pieces both the server and the CLI need to agree on.

pub mod config;
pub mod error;

pub use config::DbConfig;
pub use error::{PeekError, Result};
