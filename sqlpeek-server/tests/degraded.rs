//! Behavior against an unreachable database.
//!
//! These tests use a lazy pool pointed at a closed port, so they run
//! without any MySQL server: the first acquire fails, which is exactly
//! the failure mode the handlers must handle.

use rmcp::handler::server::wrapper::Parameters;
use sqlpeek_core::DbConfig;
use sqlpeek_server::db;
use sqlpeek_server::tools::{QueryParams, TableNameParams};
use sqlpeek_server::PeekServer;

fn unreachable_server() -> PeekServer {
    let config = DbConfig {
        host: "127.0.0.1".into(),
        port: 9,
        user: "nobody".into(),
        password: String::new(),
        database: "nothing".into(),
    };
    PeekServer::new(db::connect_lazy(&config))
}

#[tokio::test]
async fn health_check_never_errors() {
    let server = unreachable_server();
    let result = server
        .health_check()
        .await
        .expect("health_check must return a payload, not an error");
    // A degraded database is reported as a normal status payload.
    assert_ne!(result.is_error, Some(true));
}

#[tokio::test]
async fn list_tables_propagates_connection_failure() {
    let server = unreachable_server();
    let err = server
        .list_tables()
        .await
        .expect_err("list_tables must surface the failure");
    assert!(err.message.contains("connection"));
}

#[tokio::test]
async fn schema_and_query_tools_propagate_failures() {
    let server = unreachable_server();

    assert!(server
        .get_table_schema(Parameters(TableNameParams {
            table_name: "coupons".into(),
        }))
        .await
        .is_err());

    assert!(server
        .get_table_data(Parameters(QueryParams {
            query: "SELECT 1".into(),
        }))
        .await
        .is_err());

    assert!(server
        .show_indexes_table(Parameters(TableNameParams {
            table_name: "coupons".into(),
        }))
        .await
        .is_err());

    assert!(server
        .show_explain_query(Parameters(QueryParams {
            query: "SELECT 1".into(),
        }))
        .await
        .is_err());
}

#[tokio::test]
async fn pool_close_after_failed_service_is_clean() {
    let server = unreachable_server();
    let pool = server.pool().clone();

    let _ = server.health_check().await;

    db::close(&pool).await;
    assert!(pool.is_closed());
}
