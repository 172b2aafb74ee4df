//! Transaction endpoints
//!
//! Writes take scalar `postingNumber`/`accountId`/`categoryId` references;
//! reads embed the full account and category.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::api::extract::{non_null, Json};
use crate::domain::{NewTransaction, Transaction, TransactionChanges};
use crate::error::{ApiError, ApiResult};
use crate::store::TransactionStore;

// =========================================================================
// Request types
// =========================================================================

/// Body for transaction create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBody {
    #[serde(default, deserialize_with = "non_null")]
    pub posting_number: Option<i64>,
    #[serde(default, deserialize_with = "non_null")]
    pub account_id: Option<i64>,
    #[serde(default, deserialize_with = "non_null")]
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "non_null")]
    pub amount: Option<Decimal>,
    #[serde(default, deserialize_with = "non_null")]
    pub note: Option<String>,
}

// =========================================================================
// Routes
// =========================================================================

pub fn router() -> Router<SqlitePool> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
        .route("/transactions/:id", get(get_transaction))
        .route("/transactions/:id", put(replace_transaction))
        .route("/transactions/:id", patch(update_transaction))
        .route("/transactions/:id", delete(delete_transaction))
}

// =========================================================================
// Handlers
// =========================================================================

async fn list_transactions(State(pool): State<SqlitePool>) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = TransactionStore::new(pool).list().await?;
    Ok(Json(transactions))
}

async fn create_transaction(
    State(pool): State<SqlitePool>,
    Json(body): Json<TransactionBody>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let new = NewTransaction::new(
        body.posting_number,
        body.account_id,
        body.category_id,
        body.amount,
        body.note,
    )?;
    let transaction = TransactionStore::new(pool).insert(new).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn get_transaction(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Transaction>> {
    let transaction = TransactionStore::new(pool)
        .get(id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Transaction", id })?;
    Ok(Json(transaction))
}

async fn replace_transaction(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(body): Json<TransactionBody>,
) -> ApiResult<Json<Transaction>> {
    let changes = TransactionChanges::replace(
        body.posting_number,
        body.account_id,
        body.category_id,
        body.amount,
        body.note,
    )?;
    let transaction = TransactionStore::new(pool).update(id, changes).await?;
    Ok(Json(transaction))
}

async fn update_transaction(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(body): Json<TransactionBody>,
) -> ApiResult<Json<Transaction>> {
    let changes = TransactionChanges::patch(
        body.posting_number,
        body.account_id,
        body.category_id,
        body.amount,
        body.note,
    )?;
    let transaction = TransactionStore::new(pool).update(id, changes).await?;
    Ok(Json(transaction))
}

async fn delete_transaction(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    TransactionStore::new(pool).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
