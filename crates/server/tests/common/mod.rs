#![allow(dead_code)]

use account_manager_server::config::ServerConfig;
use account_manager_server::db;
use account_manager_server::web::create_axum_router;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const ADMIN_USER: &str = "test-admin";
pub const ADMIN_PASSWORD: &str = "test-password";

pub struct TestContext {
    pub db: DatabaseConnection,
    pub app: axum::Router,
}

pub async fn build_test_context() -> TestContext {
    let db = db::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database should open");
    db::init_schema(&db).await.expect("schema should be created");

    let config = ServerConfig {
        admin_username: ADMIN_USER.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        ..ServerConfig::default()
    };
    let app = create_axum_router(db.clone(), Arc::new(config));

    TestContext { db, app }
}

pub async fn request_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let req_body = match body {
        Some(body) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let req = builder.body(req_body).expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, json)
}
