#![allow(dead_code)]

use account_manager_client::{AccountManager, AccountsApi, RetryPolicy};
use account_manager_server::config::ServerConfig;
use account_manager_server::db;
use account_manager_server::web::create_axum_router;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const ADMIN_USER: &str = "test-admin";
pub const ADMIN_PASSWORD: &str = "test-password";

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        attempts: 3,
        delay: Duration::from_millis(10),
    }
}

/// Runs the real server router on an ephemeral port over an in-memory database.
pub async fn spawn_server() -> String {
    let db = db::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database should open");
    db::init_schema(&db).await.expect("schema should be created");

    let config = ServerConfig {
        admin_username: ADMIN_USER.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        ..ServerConfig::default()
    };
    let app = create_axum_router(db, Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind should work");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });

    format!("http://{addr}")
}

/// A server answering every request with a 500 and counting connections.
pub async fn spawn_failing_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind should work");
    let addr = listener.local_addr().expect("listener has an address");
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 4\r\nConnection: close\r\n\r\nboom",
                    )
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), hits)
}

/// Accepts every change but fails every listing with a 500.
pub async fn spawn_read_failing_server() -> String {
    async fn accepted() -> Json<Value> {
        Json(json!({ "status": "success" }))
    }

    async fn broken_list() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom")
    }

    let app = Router::new()
        .route("/accounts", get(broken_list).post(accepted))
        .route("/accounts/{id}", put(accepted).delete(accepted))
        .route("/verify_admin", post(accepted));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind should work");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });

    format!("http://{addr}")
}

/// A server that accepts connections and never answers.
pub async fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind should work");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{addr}")
}

pub fn manager_for(base_url: &str) -> AccountManager {
    let api = AccountsApi::new(base_url, Duration::from_secs(5)).expect("client should build");
    AccountManager::new(api, fast_retry())
}
