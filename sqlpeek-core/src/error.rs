/// Structured error types for the sqlpeek libraries.
///
/// Uses `thiserror` for better API surface and error composition.
/// The binary crate (sqlpeek-cli) can still use `anyhow` for convenience,
/// but library consumers get structured, composable errors.
use thiserror::Error;

/// Main error type for sqlpeek operations.
///
/// The connection/query split follows where the failure occurred: pool
/// creation and connection acquisition are `Connection`, statement
/// execution is `Query`. Handlers never inspect the underlying driver
/// error to reclassify it.
#[derive(Error, Debug)]
pub enum PeekError {
    /// The pool could not be created or a connection could not be acquired
    #[error("database connection error: {reason}")]
    Connection { reason: String },

    /// The database rejected or failed a statement
    #[error("query error: {reason}")]
    Query { reason: String },

    /// Configuration error
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for sqlpeek operations
pub type Result<T> = std::result::Result<T, PeekError>;

impl PeekError {
    /// Create a connection error
    pub fn connection(reason: impl ToString) -> Self {
        Self::Connection {
            reason: reason.to_string(),
        }
    }

    /// Create a query error
    pub fn query(reason: impl ToString) -> Self {
        Self::Query {
            reason: reason.to_string(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
