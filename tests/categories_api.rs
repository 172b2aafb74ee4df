//! Category API integration tests

use axum::http::StatusCode;
use axum::Router;
use chrono::Local;
use serde_json::json;

mod common;

async fn seed_category(app: &Router) -> i64 {
    let (status, body) = common::post(app, "/categories", json!({"name": "Test Category"})).await;
    assert_eq!(status, StatusCode::CREATED, "Category creation failed");
    body["id"].as_i64().unwrap()
}

async fn category_count(app: &Router) -> usize {
    let (status, body) = common::get(app, "/categories").await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().len()
}

#[tokio::test]
async fn test_create_category() {
    let (app, _db) = common::setup_app().await;
    let id = seed_category(&app).await;

    let (status, body) = common::get(&app, &format!("/categories/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Test Category");
    assert_eq!(body["createdDate"], Local::now().date_naive().to_string());
    assert_eq!(category_count(&app).await, 1);
}

#[tokio::test]
async fn test_create_category_invalid_name() {
    let (app, _db) = common::setup_app().await;
    seed_category(&app).await;

    let (status, body) = common::post(&app, "/categories", json!({"name": true})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "validation_error");
    assert!(body["fields"]["name"].is_array());
    assert_eq!(category_count(&app).await, 1);
}

#[tokio::test]
async fn test_create_category_name_too_long() {
    let (app, _db) = common::setup_app().await;
    seed_category(&app).await;

    let (status, body) = common::post(&app, "/categories", json!({"name": "a".repeat(100)})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["name"][0], "Must be 50 characters or fewer");
    assert_eq!(category_count(&app).await, 1);
}

#[tokio::test]
async fn test_create_category_name_already_exists() {
    let (app, _db) = common::setup_app().await;
    seed_category(&app).await;

    let (status, body) = common::post(&app, "/categories", json!({"name": "Test Category"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["name"][0],
        "A category with this name already exists"
    );
    assert_eq!(category_count(&app).await, 1);
}

#[tokio::test]
async fn test_create_category_blank_name() {
    let (app, _db) = common::setup_app().await;

    let (status, body) = common::post(&app, "/categories", json!({"name": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["name"][0], "Must not be blank");
}

#[tokio::test]
async fn test_get_category_not_found() {
    let (app, _db) = common::setup_app().await;

    let (status, body) = common::get(&app, "/categories/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "not_found");
}

#[tokio::test]
async fn test_update_category_name() {
    let (app, _db) = common::setup_app().await;
    let id = seed_category(&app).await;

    let (status, body) = common::patch(
        &app,
        &format!("/categories/{id}"),
        json!({"name": "Second Test Category"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Second Test Category");
    assert_eq!(body["createdDate"], Local::now().date_naive().to_string());
    assert_eq!(category_count(&app).await, 1);
}

#[tokio::test]
async fn test_update_created_date_is_ignored() {
    let (app, _db) = common::setup_app().await;
    let id = seed_category(&app).await;

    let (status, body) = common::patch(
        &app,
        &format!("/categories/{id}"),
        json!({"createdDate": "2020-01-01"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Test Category");
    assert_eq!(body["createdDate"], Local::now().date_naive().to_string());
}

#[tokio::test]
async fn test_update_category_name_invalid_name() {
    let (app, _db) = common::setup_app().await;
    let id = seed_category(&app).await;

    let (status, _) = common::patch(&app, &format!("/categories/{id}"), json!({"name": true})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(category_count(&app).await, 1);
}

#[tokio::test]
async fn test_update_category_name_too_long() {
    let (app, _db) = common::setup_app().await;
    let id = seed_category(&app).await;

    let (status, body) = common::patch(
        &app,
        &format!("/categories/{id}"),
        json!({"name": "a".repeat(100)}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["name"][0], "Must be 50 characters or fewer");
}

#[tokio::test]
async fn test_update_category_name_that_already_exists() {
    let (app, _db) = common::setup_app().await;
    seed_category(&app).await;
    let (_, body) = common::post(&app, "/categories", json!({"name": "Test"})).await;
    let second = body["id"].as_i64().unwrap();

    let (status, body) = common::patch(
        &app,
        &format!("/categories/{second}"),
        json!({"name": "Test Category"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["name"][0],
        "A category with this name already exists"
    );
}

#[tokio::test]
async fn test_update_all_fields() {
    let (app, _db) = common::setup_app().await;
    let id = seed_category(&app).await;

    let (status, body) = common::put(
        &app,
        &format!("/categories/{id}"),
        json!({"name": "Other name"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Other name");
    assert_eq!(body["createdDate"], Local::now().date_naive().to_string());
    assert_eq!(category_count(&app).await, 1);
}

#[tokio::test]
async fn test_replace_category_requires_name() {
    let (app, _db) = common::setup_app().await;
    let id = seed_category(&app).await;

    let (status, body) = common::put(&app, &format!("/categories/{id}"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["name"][0], "This field is required");
}

#[tokio::test]
async fn test_delete_category() {
    let (app, _db) = common::setup_app().await;
    let id = seed_category(&app).await;

    let (status, _) = common::delete(&app, &format!("/categories/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(category_count(&app).await, 0);
}

#[tokio::test]
async fn test_delete_category_with_budget() {
    let (app, _db) = common::setup_app().await;
    let id = seed_category(&app).await;
    let (status, budget) = common::post(
        &app,
        "/budgets",
        json!({"categoryId": id, "amount": "100"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::delete(&app, &format!("/categories/{id}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "protected");
    assert!(body["error"].as_str().unwrap().contains("1 budget"));

    let budget_id = budget["id"].as_i64().unwrap();
    let (status, _) = common::delete(&app, &format!("/budgets/{budget_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = common::delete(&app, &format!("/categories/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_category_with_transaction_and_budget() {
    let (app, _db) = common::setup_app().await;
    let id = seed_category(&app).await;
    let (_, account) = common::post(&app, "/accounts", json!({"name": "Cash"})).await;
    common::post(&app, "/postings", json!({"postingNumber": 1})).await;
    common::post(
        &app,
        "/transactions",
        json!({
            "postingNumber": 1,
            "accountId": account["id"],
            "categoryId": id,
            "amount": "5"
        }),
    )
    .await;
    common::post(&app, "/budgets", json!({"categoryId": id, "amount": "100"})).await;

    let (status, body) = common::delete(&app, &format!("/categories/{id}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("1 transaction"));
    assert!(message.contains("1 budget"));
}
