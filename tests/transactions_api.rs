//! Transaction API integration tests

use axum::http::StatusCode;
use axum::Router;
use serde_json::json;

mod common;

/// Account, category and posting number 1 for transactions to reference.
async fn seed_references(app: &Router) -> (i64, i64) {
    let (status, account) = common::post(app, "/accounts", json!({"name": "Checking"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, category) = common::post(app, "/categories", json!({"name": "Groceries"})).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = common::post(app, "/postings", json!({"postingNumber": 1})).await;
    assert_eq!(status, StatusCode::CREATED);
    (
        account["id"].as_i64().unwrap(),
        category["id"].as_i64().unwrap(),
    )
}

async fn seed_transaction(app: &Router, account_id: i64, category_id: i64) -> i64 {
    let (status, body) = common::post(
        app,
        "/transactions",
        json!({
            "postingNumber": 1,
            "accountId": account_id,
            "categoryId": category_id,
            "amount": "45.5"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Transaction creation failed");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_create_transaction() {
    let (app, _db) = common::setup_app().await;
    let (account_id, category_id) = seed_references(&app).await;

    let (status, body) = common::post(
        &app,
        "/transactions",
        json!({
            "postingNumber": 1,
            "accountId": account_id,
            "categoryId": category_id,
            "amount": "45.5",
            "note": "weekly shop"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["postingNumber"], 1);
    assert_eq!(body["amount"], "45.5000");
    assert_eq!(body["note"], "weekly shop");
    assert_eq!(body["account"]["id"], account_id);
    assert_eq!(body["account"]["name"], "Checking");
    assert_eq!(body["category"]["id"], category_id);
    assert_eq!(body["category"]["name"], "Groceries");
}

#[tokio::test]
async fn test_create_transaction_negative_amount() {
    let (app, _db) = common::setup_app().await;
    let (account_id, category_id) = seed_references(&app).await;

    let (status, body) = common::post(
        &app,
        "/transactions",
        json!({
            "postingNumber": 1,
            "accountId": account_id,
            "categoryId": category_id,
            "amount": "-45.99"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["amount"], "-45.9900");
    assert_eq!(body["note"], "");
}

#[tokio::test]
async fn test_create_transaction_missing_fields() {
    let (app, _db) = common::setup_app().await;

    let (status, body) = common::post(&app, "/transactions", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "validation_error");
    for field in ["postingNumber", "accountId", "categoryId", "amount"] {
        assert_eq!(body["fields"][field][0], "This field is required");
    }
}

#[tokio::test]
async fn test_create_transaction_unknown_references() {
    let (app, _db) = common::setup_app().await;
    seed_references(&app).await;

    let (status, body) = common::post(
        &app,
        "/transactions",
        json!({
            "postingNumber": 999,
            "accountId": 998,
            "categoryId": 997,
            "amount": "1"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["postingNumber"][0], "Posting 999 does not exist");
    assert_eq!(body["fields"]["accountId"][0], "Account 998 does not exist");
    assert_eq!(body["fields"]["categoryId"][0], "Category 997 does not exist");

    let (_, list) = common::get(&app, "/transactions").await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_transaction_too_many_decimal_places() {
    let (app, _db) = common::setup_app().await;
    let (account_id, category_id) = seed_references(&app).await;

    let (status, body) = common::post(
        &app,
        "/transactions",
        json!({
            "postingNumber": 1,
            "accountId": account_id,
            "categoryId": category_id,
            "amount": "1.00001"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["amount"][0],
        "Amount has too many decimal places (max 4, got 5)"
    );
}

#[tokio::test]
async fn test_create_transaction_too_many_digits() {
    let (app, _db) = common::setup_app().await;
    let (account_id, category_id) = seed_references(&app).await;

    let (status, body) = common::post(
        &app,
        "/transactions",
        json!({
            "postingNumber": 1,
            "accountId": account_id,
            "categoryId": category_id,
            "amount": "1000000000000000"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"]["amount"][0],
        "Amount has too many digits before the decimal point (max 15)"
    );
}

#[tokio::test]
async fn test_create_transaction_invalid_amount() {
    let (app, _db) = common::setup_app().await;
    let (account_id, category_id) = seed_references(&app).await;

    let (status, body) = common::post(
        &app,
        "/transactions",
        json!({
            "postingNumber": 1,
            "accountId": account_id,
            "categoryId": category_id,
            "amount": "abc"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["amount"].is_array());
}

#[tokio::test]
async fn test_get_transaction_not_found() {
    let (app, _db) = common::setup_app().await;

    let (status, body) = common::get(&app, "/transactions/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "not_found");
}

#[tokio::test]
async fn test_list_transactions() {
    let (app, _db) = common::setup_app().await;
    let (account_id, category_id) = seed_references(&app).await;
    let first = seed_transaction(&app, account_id, category_id).await;
    let second = seed_transaction(&app, account_id, category_id).await;

    let (status, list) = common::get(&app, "/transactions").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn test_update_transaction_amount() {
    let (app, _db) = common::setup_app().await;
    let (account_id, category_id) = seed_references(&app).await;
    let id = seed_transaction(&app, account_id, category_id).await;

    let (status, body) = common::patch(
        &app,
        &format!("/transactions/{id}"),
        json!({"amount": "99"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], "99.0000");
    assert_eq!(body["postingNumber"], 1);
}

#[tokio::test]
async fn test_update_transaction_reassign_posting() {
    let (app, _db) = common::setup_app().await;
    let (account_id, category_id) = seed_references(&app).await;
    let id = seed_transaction(&app, account_id, category_id).await;
    common::post(&app, "/postings", json!({"postingNumber": 2})).await;

    let (status, body) = common::patch(
        &app,
        &format!("/transactions/{id}"),
        json!({"postingNumber": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["postingNumber"], 2);

    // The transaction now shows up under the new posting
    let (_, posting) = common::get(&app, "/postings/2").await;
    assert_eq!(posting["transactions"].as_array().unwrap().len(), 1);
    let (_, posting) = common::get(&app, "/postings/1").await;
    assert_eq!(posting["transactions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_update_transaction_unknown_account() {
    let (app, _db) = common::setup_app().await;
    let (account_id, category_id) = seed_references(&app).await;
    let id = seed_transaction(&app, account_id, category_id).await;

    let (status, body) = common::patch(
        &app,
        &format!("/transactions/{id}"),
        json!({"accountId": 999}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["accountId"][0], "Account 999 does not exist");
}

#[tokio::test]
async fn test_replace_transaction() {
    let (app, _db) = common::setup_app().await;
    let (account_id, category_id) = seed_references(&app).await;
    let id = seed_transaction(&app, account_id, category_id).await;

    let (status, body) = common::put(
        &app,
        &format!("/transactions/{id}"),
        json!({
            "postingNumber": 1,
            "accountId": account_id,
            "categoryId": category_id,
            "amount": "12.25",
            "note": "updated"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], "12.2500");
    assert_eq!(body["note"], "updated");
}

#[tokio::test]
async fn test_replace_transaction_missing_amount() {
    let (app, _db) = common::setup_app().await;
    let (account_id, category_id) = seed_references(&app).await;
    let id = seed_transaction(&app, account_id, category_id).await;

    let (status, body) = common::put(
        &app,
        &format!("/transactions/{id}"),
        json!({
            "postingNumber": 1,
            "accountId": account_id,
            "categoryId": category_id
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["amount"][0], "This field is required");
}

#[tokio::test]
async fn test_delete_transaction() {
    let (app, _db) = common::setup_app().await;
    let (account_id, category_id) = seed_references(&app).await;
    let id = seed_transaction(&app, account_id, category_id).await;

    let (status, _) = common::delete(&app, &format!("/transactions/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = common::get(&app, "/transactions").await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_delete_transaction_not_found() {
    let (app, _db) = common::setup_app().await;

    let (status, _) = common::delete(&app, "/transactions/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
