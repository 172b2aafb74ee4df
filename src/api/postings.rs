//! Posting endpoints
//!
//! Postings are addressed by their user-chosen posting number rather than a
//! surrogate id, and the number is write-once: updates must either omit it
//! or repeat the path value.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::api::extract::{non_null, Json};
use crate::domain::{NewPosting, Posting, PostingChanges, ValidationErrors};
use crate::error::{ApiError, ApiResult};
use crate::store::PostingStore;

// =========================================================================
// Request types
// =========================================================================

/// Body for posting create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingBody {
    #[serde(default, deserialize_with = "non_null")]
    pub posting_number: Option<i64>,
    #[serde(default, deserialize_with = "non_null")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "type", default, deserialize_with = "non_null")]
    pub posting_type: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub payee: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub cleared: Option<bool>,
    #[serde(default, deserialize_with = "non_null")]
    pub note: Option<String>,
}

// =========================================================================
// Routes
// =========================================================================

pub fn router() -> Router<SqlitePool> {
    Router::new()
        .route("/postings", get(list_postings))
        .route("/postings", post(create_posting))
        .route("/postings/:number", get(get_posting))
        .route("/postings/:number", put(update_posting))
        .route("/postings/:number", patch(update_posting))
        .route("/postings/:number", delete(delete_posting))
}

// =========================================================================
// Handlers
// =========================================================================

async fn list_postings(State(pool): State<SqlitePool>) -> ApiResult<Json<Vec<Posting>>> {
    let postings = PostingStore::new(pool).list().await?;
    Ok(Json(postings))
}

async fn create_posting(
    State(pool): State<SqlitePool>,
    Json(body): Json<PostingBody>,
) -> ApiResult<(StatusCode, Json<Posting>)> {
    let today = Local::now().date_naive();
    let new = NewPosting::new(
        body.posting_number,
        body.date,
        body.posting_type,
        body.payee,
        body.cleared,
        body.note,
        today,
    )?;
    let posting = PostingStore::new(pool).insert(new).await?;
    Ok((StatusCode::CREATED, Json(posting)))
}

async fn get_posting(
    State(pool): State<SqlitePool>,
    Path(number): Path<i64>,
) -> ApiResult<Json<Posting>> {
    let posting = PostingStore::new(pool)
        .get(number)
        .await?
        .ok_or(ApiError::NotFound { entity: "Posting", id: number })?;
    Ok(Json(posting))
}

/// Shared by PUT and PATCH: every posting field has a creation default, so
/// full and partial updates behave the same.
async fn update_posting(
    State(pool): State<SqlitePool>,
    Path(number): Path<i64>,
    Json(body): Json<PostingBody>,
) -> ApiResult<Json<Posting>> {
    if body.posting_number.is_some_and(|n| n != number) {
        return Err(ValidationErrors::single("postingNumber", "Posting number cannot be changed").into());
    }
    let changes = PostingChanges::patch(
        body.date,
        body.posting_type,
        body.payee,
        body.cleared,
        body.note,
    )?;
    let posting = PostingStore::new(pool).update(number, changes).await?;
    Ok(Json(posting))
}

async fn delete_posting(
    State(pool): State<SqlitePool>,
    Path(number): Path<i64>,
) -> ApiResult<StatusCode> {
    PostingStore::new(pool).delete(number).await?;
    Ok(StatusCode::NO_CONTENT)
}
