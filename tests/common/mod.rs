//! Common test utilities

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt;

use funds_api::{api, db};

/// Setup test app - fresh on-disk SQLite database with the schema applied
/// and the API router wired to it. The returned TempDir owns the database
/// file and must be kept alive for the duration of the test.
pub async fn setup_app() -> (Router, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let url = format!("sqlite:{}", dir.path().join("funds-test.db").display());

    let pool = db::connect(&url, 5).await.expect("Failed to connect to DB");
    db::migrate(&pool).await.expect("Failed to run migrations");

    let app = api::create_router().with_state(pool);
    (app, dir)
}

/// Send a request and return the status plus the parsed JSON body
/// (Value::Null when the body is empty, e.g. for 204 responses).
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body was not JSON")
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request(app, "POST", uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request(app, "PUT", uri, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    request(app, "PATCH", uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, "DELETE", uri, None).await
}
