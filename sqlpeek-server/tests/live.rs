//! Integration tests against a real MySQL database.
//!
//! Run with: MYSQL_DATABASE_HOST=... MYSQL_DATABASE_USER=... \
//!           MYSQL_DATABASE_PASSWORD=... MYSQL_DATABASE_NAME=... \
//!           cargo test -p sqlpeek-server -- --ignored
//!
//! The suite creates its own scratch table and cleans it up.

use rmcp::handler::server::wrapper::Parameters;
use sqlpeek_core::DbConfig;
use sqlpeek_server::db;
use sqlpeek_server::tools::{QueryParams, TableNameParams};
use sqlpeek_server::PeekServer;

const SCRATCH_TABLE: &str = "sqlpeek_live_scratch";

async fn live_server() -> PeekServer {
    let config = DbConfig::from_env().expect("MYSQL_DATABASE_* required");
    let pool = db::connect(&config).await.expect("pool creation failed");
    PeekServer::new(pool)
}

async fn create_scratch_table(server: &PeekServer) {
    for statement in [
        format!("DROP TABLE IF EXISTS {SCRATCH_TABLE}"),
        format!(
            "CREATE TABLE {SCRATCH_TABLE} (
                id INT NOT NULL AUTO_INCREMENT,
                batch_id VARCHAR(64) NOT NULL,
                amount DECIMAL(10,2),
                PRIMARY KEY (id),
                KEY batch_id_index (batch_id)
            )"
        ),
    ] {
        sqlx::query(&statement)
            .execute(server.pool())
            .await
            .expect("scratch table setup failed");
    }

    // Sessions run with autocommit off, so the seed rows need an explicit
    // transaction pinned to one connection.
    let mut tx = server.pool().begin().await.expect("begin failed");
    sqlx::query(&format!(
        "INSERT INTO {SCRATCH_TABLE} (batch_id, amount) VALUES ('b1', 10.50), ('b2', NULL)"
    ))
    .execute(&mut *tx)
    .await
    .expect("seed insert failed");
    tx.commit().await.expect("commit failed");
}

async fn drop_scratch_table(server: &PeekServer) {
    sqlx::query(&format!("DROP TABLE IF EXISTS {SCRATCH_TABLE}"))
        .execute(server.pool())
        .await
        .expect("scratch table teardown failed");
}

#[tokio::test]
#[ignore = "requires database"]
async fn health_check_reports_healthy() {
    let server = live_server().await;
    let result = server.health_check().await.expect("health payload");
    assert_ne!(result.is_error, Some(true));
}

#[tokio::test]
#[ignore = "requires database"]
async fn list_tables_includes_scratch_table() {
    let server = live_server().await;
    create_scratch_table(&server).await;

    let result = server.list_tables().await.expect("list_tables failed");
    assert_ne!(result.is_error, Some(true));

    drop_scratch_table(&server).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn schema_and_indexes_round_trip() {
    let server = live_server().await;
    create_scratch_table(&server).await;

    let schema = server
        .get_table_schema(Parameters(TableNameParams {
            table_name: SCRATCH_TABLE.into(),
        }))
        .await
        .expect("get_table_schema failed");
    assert_ne!(schema.is_error, Some(true));

    let indexes = server
        .show_indexes_table(Parameters(TableNameParams {
            table_name: SCRATCH_TABLE.into(),
        }))
        .await
        .expect("show_indexes_table failed");
    assert_ne!(indexes.is_error, Some(true));

    drop_scratch_table(&server).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn query_and_explain_round_trip() {
    let server = live_server().await;
    create_scratch_table(&server).await;

    let data = server
        .get_table_data(Parameters(QueryParams {
            query: format!("SELECT * FROM {SCRATCH_TABLE} ORDER BY id"),
        }))
        .await
        .expect("get_table_data failed");
    assert_ne!(data.is_error, Some(true));

    let empty = server
        .get_table_data(Parameters(QueryParams {
            query: format!("SELECT * FROM {SCRATCH_TABLE} WHERE id < 0"),
        }))
        .await
        .expect("empty result set is not an error");
    assert_ne!(empty.is_error, Some(true));

    let plan = server
        .show_explain_query(Parameters(QueryParams {
            query: format!("SELECT * FROM {SCRATCH_TABLE} WHERE batch_id = 'b1'"),
        }))
        .await
        .expect("show_explain_query failed");
    assert_ne!(plan.is_error, Some(true));

    drop_scratch_table(&server).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn bad_statement_is_a_query_error() {
    let server = live_server().await;
    let err = server
        .get_table_data(Parameters(QueryParams {
            query: "SELECT definitely not sql".into(),
        }))
        .await
        .expect_err("invalid SQL must surface as an error");
    assert!(err.message.contains("query error"));
}
