//! The six inspection tools exposed over MCP.
//!
//! Each tool brokers exactly one SQL statement: acquire a connection from
//! the shared pool (scoped inside sqlx, released on every exit path),
//! run the statement, reshape the rows, return. `health_check` is the
//! only tool that converts failures into a normal payload; every other
//! tool propagates its error to the protocol layer as an MCP error.
//!
//! Table names and SQL text are interpolated into statements verbatim.
//! That is a deliberate trust boundary — the calling agent holds the
//! database credentials' full power — not a validation gap.

use std::collections::BTreeMap;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sqlx::MySqlPool;

use sqlpeek_core::PeekError;

use crate::rows::{row_to_map, rows_to_list};

// ---------------------------------------------------------------------------
// Parameter structs — field doc comments surface as descriptions in the
// MCP JSON Schema.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TableNameParams {
    /// Name of the table to inspect
    pub table_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryParams {
    /// The SQL statement to execute verbatim
    pub query: String,
}

// ---------------------------------------------------------------------------
// Index grouping
// ---------------------------------------------------------------------------

/// One raw `SHOW INDEX` row: a single (index, column) membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub index_name: String,
    /// 1-based position of the column within the index
    pub seq_in_index: u32,
    pub column_name: String,
}

impl IndexRow {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            index_name: str_field(map, "Key_name"),
            seq_in_index: map
                .get("Seq_in_index")
                .and_then(Value::as_u64)
                .unwrap_or(0) as u32,
            column_name: str_field(map, "Column_name"),
        }
    }
}

fn str_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// One index with its columns in composite order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IndexSummary {
    pub index_name: String,
    pub columns: Vec<String>,
}

/// Group raw (index, column) rows by index name and order each group's
/// columns by their sequence position. Order across distinct index names
/// is not part of the contract; within an index it is.
pub fn group_index_rows(rows: Vec<IndexRow>) -> Vec<IndexSummary> {
    let mut grouped: BTreeMap<String, Vec<(u32, String)>> = BTreeMap::new();
    for row in rows {
        grouped
            .entry(row.index_name)
            .or_default()
            .push((row.seq_in_index, row.column_name));
    }

    grouped
        .into_iter()
        .map(|(index_name, mut cols)| {
            cols.sort_by_key(|(seq, _)| *seq);
            IndexSummary {
                index_name,
                columns: cols.into_iter().map(|(_, name)| name).collect(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Payload shaping — pure, so the response contracts are testable without
// a database.
// ---------------------------------------------------------------------------

fn health_payload(outcome: Result<i64, PeekError>) -> Value {
    match outcome {
        Ok(sentinel) => json!({
            "status": "healthy",
            "database": "connected",
            "result": sentinel,
        }),
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            json!({
                "status": "error",
                "error": "Service unavailable",
            })
        }
    }
}

fn tables_payload(tables: Vec<String>) -> Value {
    Value::Array(
        tables
            .into_iter()
            .map(|name| json!({ "tablename": name }))
            .collect(),
    )
}

fn schema_payload(rows: Vec<Map<String, Value>>) -> Value {
    Value::Array(
        rows.into_iter()
            .map(|map| {
                json!({
                    "column_name": map.get("Field").cloned().unwrap_or(Value::Null),
                    "data_type": map.get("Type").cloned().unwrap_or(Value::Null),
                })
            })
            .collect(),
    )
}

/// Serialize a JSON value into a successful tool result.
fn json_response(value: &Value) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize tool response");
            CallToolResult::error(vec![Content::text(format!(
                "failed to serialize response: {err}"
            ))])
        }
    }
}

/// Where a pool-level statement failed: acquisition problems are
/// connection errors, everything else is the statement's fault.
fn classify(err: sqlx::Error) -> PeekError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            PeekError::connection(err)
        }
        other => PeekError::query(other),
    }
}

fn mcp_error(err: PeekError) -> McpError {
    McpError::internal_error(err.to_string(), None)
}

// ---------------------------------------------------------------------------
// PeekServer
// ---------------------------------------------------------------------------

/// Tool server holding the injected connection pool.
///
/// The pool is created once during startup and shared by every concurrent
/// tool invocation; `MySqlPool` is internally reference-counted, so clones
/// of the server share one pool.
#[derive(Clone)]
pub struct PeekServer {
    pool: MySqlPool,
    tool_router: ToolRouter<Self>,
}

impl PeekServer {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            tool_router: Self::tool_router(),
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn fetch_all(&self, sql: &str) -> Result<Vec<sqlx::mysql::MySqlRow>, McpError> {
        sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| mcp_error(classify(err)))
    }
}

#[tool_router]
impl PeekServer {
    #[tool(
        description = "Check the health of the database connection. Always returns a status payload, never an error."
    )]
    pub async fn health_check(&self) -> Result<CallToolResult, McpError> {
        let outcome = sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(classify);
        Ok(json_response(&health_payload(outcome)))
    }

    #[tool(description = "List all tables in the configured database.")]
    pub async fn list_tables(&self) -> Result<CallToolResult, McpError> {
        let tables: Vec<String> = sqlx::query_scalar("SHOW TABLES")
            .fetch_all(&self.pool)
            .await
            .map_err(|err| mcp_error(classify(err)))?;
        Ok(json_response(&tables_payload(tables)))
    }

    #[tool(
        description = "Get the schema of a table: one entry per column with its name and declared data type, in declaration order."
    )]
    pub async fn get_table_schema(
        &self,
        Parameters(params): Parameters<TableNameParams>,
    ) -> Result<CallToolResult, McpError> {
        let rows = self
            .fetch_all(&format!("DESCRIBE {}", params.table_name))
            .await?;
        let maps = rows.iter().map(row_to_map).collect();
        Ok(json_response(&schema_payload(maps)))
    }

    #[tool(
        description = "Execute a SQL query and return the full result set, one JSON object per row keyed by column name."
    )]
    pub async fn get_table_data(
        &self,
        Parameters(params): Parameters<QueryParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(query = %params.query, "executing query");
        let rows = self.fetch_all(&params.query).await?;
        Ok(json_response(&Value::Array(rows_to_list(&rows))))
    }

    #[tool(
        description = "Show the indexes of a table, grouped by index name with columns in composite-index order."
    )]
    pub async fn show_indexes_table(
        &self,
        Parameters(params): Parameters<TableNameParams>,
    ) -> Result<CallToolResult, McpError> {
        let rows = self
            .fetch_all(&format!("SHOW INDEX FROM {}", params.table_name))
            .await?;
        let index_rows = rows
            .iter()
            .map(|row| IndexRow::from_map(&row_to_map(row)))
            .collect();
        let summaries = group_index_rows(index_rows);
        let value = serde_json::to_value(&summaries)
            .map_err(|err| McpError::internal_error(err.to_string(), None))?;
        Ok(json_response(&value))
    }

    #[tool(description = "Show the execution plan for a SQL query, one JSON object per plan row.")]
    pub async fn show_explain_query(
        &self,
        Parameters(params): Parameters<QueryParams>,
    ) -> Result<CallToolResult, McpError> {
        let rows = self
            .fetch_all(&format!("EXPLAIN {}", params.query))
            .await?;
        Ok(json_response(&Value::Array(rows_to_list(&rows))))
    }
}

// ---------------------------------------------------------------------------
// ServerHandler — #[tool_handler] wires call_tool + list_tools to the router
// ---------------------------------------------------------------------------

#[tool_handler]
impl ServerHandler for PeekServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "sqlpeek: read-oriented MySQL inspection. \
                 Check connectivity, list tables, describe schemas and indexes, \
                 run queries, and inspect execution plans."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sqlpeek".to_string(),
                title: Some("Sqlpeek MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
