//! API module
//!
//! Route assembly and the per-resource handler modules.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod extract;
pub mod postings;
pub mod transactions;

use axum::routing::get;
use axum::Router;
use sqlx::SqlitePool;

use crate::domain::{AccountType, PostingType};
use extract::Json;

/// Build the router with all resource routes.
pub fn create_router() -> Router<SqlitePool> {
    Router::new()
        .merge(accounts::router())
        .merge(categories::router())
        .merge(postings::router())
        .merge(transactions::router())
        .merge(budgets::router())
        .route("/account-types", get(list_account_types))
        .route("/posting-types", get(list_posting_types))
}

/// List the valid account type names
async fn list_account_types() -> Json<Vec<&'static str>> {
    Json(AccountType::ALL.iter().map(|t| t.as_str()).collect())
}

/// List the valid posting type names
async fn list_posting_types() -> Json<Vec<&'static str>> {
    Json(PostingType::ALL.iter().map(|t| t.as_str()).collect())
}
