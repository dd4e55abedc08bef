//! End-to-end tests against a real SQLite database.

use std::sync::Arc;

use axum::http::StatusCode;
use db_gateway::config::DatabaseConfig;
use db_gateway::db::{DatabaseClient, SqliteClient, Statement};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::common::{post, router_with, sqlite_router};

const CREATE_USERS: &str =
    r#"{"sql": "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT NOT NULL UNIQUE, age INTEGER)"}"#;

#[tokio::test]
async fn test_create_insert_select() {
    let router = sqlite_router().await;

    let response = post(&router, "/query", CREATE_USERS).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = post(
        &router,
        "/query",
        r#"{"sql": "INSERT INTO users (email, age) VALUES (?, ?)", "params": ["ada@example.com", 36]}"#,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["results"], json!([]));
    assert_eq!(body["meta"]["changes"], json!(1));
    assert_eq!(body["meta"]["last_row_id"], json!(1));
    assert_eq!(body["meta"]["changed_db"], json!(true));

    let response = post(
        &router,
        "/query",
        r#"{"sql": "SELECT email, age FROM users WHERE age > ?", "params": [30]}"#,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(
        body["results"],
        json!([{"email": "ada@example.com", "age": 36}])
    );
    assert_eq!(body["meta"]["rows_read"], json!(1));
    assert_eq!(body["meta"]["changed_db"], json!(false));
}

#[tokio::test]
async fn test_repeated_read_is_idempotent() {
    let router = sqlite_router().await;
    post(&router, "/query", CREATE_USERS).await;
    post(
        &router,
        "/batch",
        r#"[
            {"sql": "INSERT INTO users (email) VALUES (?)", "params": ["a@example.com"]},
            {"sql": "INSERT INTO users (email) VALUES (?)", "params": ["b@example.com"]}
        ]"#,
    )
    .await;

    let query = r#"{"sql": "SELECT id, email FROM users ORDER BY id"}"#;
    let first = post(&router, "/query", query).await.json();
    let second = post(&router, "/query", query).await.json();

    assert_eq!(first["results"], second["results"]);
    for key in ["changes", "last_row_id", "changed_db", "rows_read", "rows_written"] {
        assert_eq!(first["meta"][key], second["meta"][key], "meta.{key}");
    }
}

#[tokio::test]
async fn test_batch_results_in_order() {
    let router = sqlite_router().await;
    post(&router, "/query", CREATE_USERS).await;

    let response = post(
        &router,
        "/batch",
        r#"{"statements": [
            {"sql": "INSERT INTO users (email, age) VALUES (?, ?)", "params": ["x@example.com", 20]},
            {"sql": "UPDATE users SET age = age + 1"},
            {"sql": "SELECT email, age FROM users"}
        ]}"#,
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["meta"]["changes"], json!(1));
    assert_eq!(results[1]["meta"]["changes"], json!(1));
    assert_eq!(
        results[2]["results"],
        json!([{"email": "x@example.com", "age": 21}])
    );
}

#[tokio::test]
async fn test_failed_batch_applies_nothing() {
    let router = sqlite_router().await;
    post(&router, "/query", CREATE_USERS).await;

    let response = post(
        &router,
        "/batch",
        r#"[
            {"sql": "INSERT INTO users (email) VALUES ('dup@example.com')"},
            {"sql": "INSERT INTO users (email) VALUES ('dup@example.com')"}
        ]"#,
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({"success": false, "error": "UNIQUE constraint failed: users.email"})
    );

    let count = post(&router, "/query", r#"{"sql": "SELECT COUNT(*) AS n FROM users"}"#)
        .await
        .json();
    assert_eq!(count["results"], json!([{"n": 0}]));
}

#[tokio::test]
async fn test_sql_error_message_is_raw() {
    let router = sqlite_router().await;

    let response = post(&router, "/query", r#"{"sql": "SELECT * FROM nowhere"}"#).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({"success": false, "error": "no such table: nowhere"})
    );
}

#[tokio::test]
async fn test_unsupported_param_type() {
    let router = sqlite_router().await;

    let response = post(
        &router,
        "/query",
        r#"{"sql": "SELECT ?", "params": [[1, 2]]}"#,
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({"success": false, "error": "Type 'array' not supported for value [1,2]"})
    );
}

#[tokio::test]
async fn test_file_database_shared_with_direct_client() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig::from_url(format!(
        "sqlite:{}",
        dir.path().join("shared.db").display()
    ));

    let client = Arc::new(SqliteClient::connect(&config).await.unwrap());
    client
        .all(&Statement::new("CREATE TABLE notes (body TEXT)"))
        .await
        .unwrap();

    let router = router_with(client.clone());
    let response = post(
        &router,
        "/query",
        r#"{"sql": "INSERT INTO notes VALUES (?)", "params": ["hello"]}"#,
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    let result = client
        .all(&Statement::new("SELECT body FROM notes"))
        .await
        .unwrap();
    assert_eq!(result.results.unwrap()[0]["body"], json!("hello"));

    client.close().await.unwrap();
}
