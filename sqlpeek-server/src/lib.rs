//! sqlpeek-server: MCP server core for read-oriented MySQL inspection.
//!
//! Holds one shared connection pool and brokers each incoming tool call
//! into a single SQL statement, returning normalized JSON rows. The
//! transport framing (stdio or SSE) is delegated to the rmcp SDK.

pub mod db;
pub mod rows;
pub mod server;
pub mod tools;

pub use server::{run_sse, run_stdio, ServeConfig};
pub use tools::PeekServer;
