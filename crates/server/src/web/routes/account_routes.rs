use account_manager_common::{Account, AccountUpdate, NewAccount, StatusResponse};
use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::services;
use crate::web::{AppError, AppState};

// --- Route Handlers ---

async fn list_accounts_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = services::list_accounts(&app_state.db_pool).await?;
    info!(count = accounts.len(), "Listed accounts.");
    Ok(Json(accounts))
}

async fn create_account_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Json(payload) = payload?;
    info!(username = %payload.username, "Received request to create account.");
    let created = services::create_account(&app_state.db_pool, payload).await?;
    info!(account_id = created.id, "Account created.");
    Ok(Json(StatusResponse::success()))
}

async fn update_account_handler(
    State(app_state): State<Arc<AppState>>,
    account_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<AccountUpdate>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Path(account_id) = account_id?;
    let Json(payload) = payload?;
    info!(account_id, "Received request to update account.");
    let rows_affected = services::update_account(&app_state.db_pool, account_id, payload).await?;
    if rows_affected == 0 {
        warn!(account_id, "Update matched no account.");
    }
    Ok(Json(StatusResponse::success()))
}

async fn delete_account_handler(
    State(app_state): State<Arc<AppState>>,
    account_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Path(account_id) = account_id?;
    info!(account_id, "Received request to delete account.");
    let rows_affected = services::delete_account(&app_state.db_pool, account_id).await?;
    if rows_affected == 0 {
        warn!(account_id, "Delete matched no account.");
    }
    Ok(Json(StatusResponse::success()))
}

// --- Router ---

pub fn create_accounts_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_accounts_handler).post(create_account_handler))
        .route("/{account_id}", put(update_account_handler).delete(delete_account_handler))
}
