use account_manager_common::{AdminCredentials, StatusResponse};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::services::auth_service;
use crate::web::{AppError, AppState};

async fn verify_admin_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<AdminCredentials>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Json(credentials) = payload?;
    if auth_service::verify_admin(&app_state.config, &credentials) {
        info!(username = %credentials.username, "Admin verified.");
        Ok(Json(StatusResponse::success()))
    } else {
        Ok(Json(StatusResponse::fail()))
    }
}

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new().route("/verify_admin", post(verify_admin_handler))
}
