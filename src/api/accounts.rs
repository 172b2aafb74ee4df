//! Account endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Router,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::api::extract::{non_null, Json};
use crate::domain::{Account, AccountChanges, NewAccount};
use crate::error::{ApiError, ApiResult};
use crate::store::AccountStore;

// =========================================================================
// Request types
// =========================================================================

/// Body for account create and update. Every field is optional at the wire
/// level; which ones are required depends on the method. Unknown keys
/// (`createdDate` included) are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBody {
    #[serde(default, deserialize_with = "non_null")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "non_null")]
    pub account_type: Option<String>,
}

// =========================================================================
// Routes
// =========================================================================

pub fn router() -> Router<SqlitePool> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
        .route("/accounts/:id", get(get_account))
        .route("/accounts/:id", put(replace_account))
        .route("/accounts/:id", patch(update_account))
        .route("/accounts/:id", delete(delete_account))
}

// =========================================================================
// Handlers
// =========================================================================

async fn list_accounts(State(pool): State<SqlitePool>) -> ApiResult<Json<Vec<Account>>> {
    let accounts = AccountStore::new(pool).list().await?;
    Ok(Json(accounts))
}

async fn create_account(
    State(pool): State<SqlitePool>,
    Json(body): Json<AccountBody>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let new = NewAccount::new(body.name, body.account_type)?;
    let account = AccountStore::new(pool).insert(new).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

async fn get_account(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Account>> {
    let account = AccountStore::new(pool)
        .get(id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Account", id })?;
    Ok(Json(account))
}

async fn replace_account(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(body): Json<AccountBody>,
) -> ApiResult<Json<Account>> {
    let changes = AccountChanges::replace(body.name, body.account_type)?;
    let account = AccountStore::new(pool).update(id, changes).await?;
    Ok(Json(account))
}

async fn update_account(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(body): Json<AccountBody>,
) -> ApiResult<Json<Account>> {
    let changes = AccountChanges::patch(body.name, body.account_type)?;
    let account = AccountStore::new(pool).update(id, changes).await?;
    Ok(Json(account))
}

async fn delete_account(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    AccountStore::new(pool).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
