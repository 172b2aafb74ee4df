//! Category endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Router,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::api::extract::{non_null, Json};
use crate::domain::{Category, CategoryChanges, NewCategory};
use crate::error::{ApiError, ApiResult};
use crate::store::CategoryStore;

// =========================================================================
// Request types
// =========================================================================

/// Body for category create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBody {
    #[serde(default, deserialize_with = "non_null")]
    pub name: Option<String>,
}

// =========================================================================
// Routes
// =========================================================================

pub fn router() -> Router<SqlitePool> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories", post(create_category))
        .route("/categories/:id", get(get_category))
        .route("/categories/:id", put(replace_category))
        .route("/categories/:id", patch(update_category))
        .route("/categories/:id", delete(delete_category))
}

// =========================================================================
// Handlers
// =========================================================================

async fn list_categories(State(pool): State<SqlitePool>) -> ApiResult<Json<Vec<Category>>> {
    let categories = CategoryStore::new(pool).list().await?;
    Ok(Json(categories))
}

async fn create_category(
    State(pool): State<SqlitePool>,
    Json(body): Json<CategoryBody>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let new = NewCategory::new(body.name)?;
    let category = CategoryStore::new(pool).insert(new).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn get_category(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Category>> {
    let category = CategoryStore::new(pool)
        .get(id)
        .await?
        .ok_or(ApiError::NotFound { entity: "Category", id })?;
    Ok(Json(category))
}

async fn replace_category(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(body): Json<CategoryBody>,
) -> ApiResult<Json<Category>> {
    let changes = CategoryChanges::replace(body.name)?;
    let category = CategoryStore::new(pool).update(id, changes).await?;
    Ok(Json(category))
}

async fn update_category(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(body): Json<CategoryBody>,
) -> ApiResult<Json<Category>> {
    let changes = CategoryChanges::patch(body.name)?;
    let category = CategoryStore::new(pool).update(id, changes).await?;
    Ok(Json(category))
}

async fn delete_category(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    CategoryStore::new(pool).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
