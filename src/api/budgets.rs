//! Budget endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Router,
};
use chrono::Local;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::api::extract::{non_null, Json};
use crate::domain::{Budget, BudgetChanges, NewBudget};
use crate::error::{ApiError, ApiResult};
use crate::store::BudgetStore;

// =========================================================================
// Request types
// =========================================================================

/// Body for budget create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetBody {
    #[serde(default, deserialize_with = "non_null")]
    pub month: Option<i64>,
    #[serde(default, deserialize_with = "non_null")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "non_null")]
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "non_null")]
    pub amount: Option<Decimal>,
}

// =========================================================================
// Routes
// =========================================================================

pub fn router() -> Router<SqlitePool> {
    Router::new()
        .route("/budgets", get(list_budgets))
        .route("/budgets", post(create_budget))
        .route("/budgets/:id", get(get_budget))
        .route("/budgets/:id", put(replace_budget))
        .route("/budgets/:id", patch(update_budget))
        .route("/budgets/:id", delete(delete_budget))
}

// =========================================================================
// Handlers
// =========================================================================

async fn list_budgets(State(pool): State<SqlitePool>) -> ApiResult<Json<Vec<Budget>>> {
    let budgets = BudgetStore::new(pool).list().await?;
    Ok(Json(budgets))
}

async fn create_budget(
    State(pool): State<SqlitePool>,
    Json(body): Json<BudgetBody>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    let today = Local::now().date_naive();
    let new = NewBudget::new(body.month, body.year, body.category_id, body.amount, today)?;
    let budget = BudgetStore::new(pool).insert(new).await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

async fn get_budget(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Budget>> {
    let budget = BudgetStore::new(pool)
        .get(id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Budget", id })?;
    Ok(Json(budget))
}

async fn replace_budget(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(body): Json<BudgetBody>,
) -> ApiResult<Json<Budget>> {
    let changes = BudgetChanges::replace(body.month, body.year, body.category_id, body.amount)?;
    let budget = BudgetStore::new(pool).update(id, changes).await?;
    Ok(Json(budget))
}

async fn update_budget(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(body): Json<BudgetBody>,
) -> ApiResult<Json<Budget>> {
    let changes = BudgetChanges::patch(body.month, body.year, body.category_id, body.amount)?;
    let budget = BudgetStore::new(pool).update(id, changes).await?;
    Ok(Json(budget))
}

async fn delete_budget(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    BudgetStore::new(pool).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
