#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use pipetrack_api::config::ServerConfig;
use pipetrack_api::router::build_app_router;
use pipetrack_api::state::AppState;

/// Build a test `ServerConfig`. The database URL is unused because the pool
/// is handed in by `#[sqlx::test]`.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 5,
    }
}

/// Create the tables and build the production router over `pool`.
pub async fn build_test_app(pool: PgPool) -> Router {
    pipetrack_db::create_tables(&pool).await.unwrap();
    build_app_router(AppState { pool }, &test_config())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_empty(app: &Router, uri: &str) -> Response {
    send(app, Method::POST, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Project `test` whose default task is `fx_fire`.
pub async fn create_project(app: &Router) {
    let response = post_json(
        app,
        "/api/v1/projects",
        serde_json::json!({"project": "test", "default_tasks": ["fx_fire"]}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
}

pub async fn create_shot(app: &Router, shot: &str, body: serde_json::Value) {
    let mut body = body;
    body["shot"] = serde_json::Value::from(shot);
    let response = post_json(app, "/api/v1/projects/test/shots", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
}
