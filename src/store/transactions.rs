//! Transaction storage
//!
//! Reads join the referenced account and category so responses can embed
//! them without extra round trips.

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

use crate::domain::{NewTransaction, Transaction, TransactionChanges, ValidationErrors};
use crate::error::{is_foreign_key_violation, ApiError, ApiResult};

use super::accounts::account_from_row;
use super::categories::category_from_row;

/// t.id, t.posting_num, t.amount, t.note, then the account and category
/// columns in their own row-helper order.
pub(crate) type TransactionRow = (
    i64,
    i64,
    String,
    String,
    i64,
    String,
    NaiveDate,
    String,
    i64,
    String,
    NaiveDate,
);

pub struct TransactionStore {
    pool: SqlitePool,
}

impl TransactionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> ApiResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT t.id, t.posting_num, t.amount, t.note,
                   a.id, a.name, a.created_date, a.account_type,
                   c.id, c.name, c.created_date
            FROM transactions t
            JOIN accounts a ON a.id = t.account_id
            JOIN categories c ON c.id = t.category_id
            ORDER BY t.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(transaction_from_row).collect()
    }

    pub async fn get(&self, id: i64) -> ApiResult<Option<Transaction>> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await
    }

    pub async fn insert(&self, new: NewTransaction) -> ApiResult<Transaction> {
        let mut tx = self.pool.begin().await?;

        check_references(
            &mut tx,
            Some(new.posting_number),
            Some(new.account_id),
            Some(new.category_id),
        )
        .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (posting_num, account_id, category_id, amount, note)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.posting_number)
        .bind(new.account_id)
        .bind(new.category_id)
        .bind(new.amount.to_string())
        .bind(&new.note)
        .execute(&mut *tx)
        .await;

        let id = match result {
            Ok(done) => done.last_insert_rowid(),
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(
                    ValidationErrors::single("body", "A referenced row no longer exists").into(),
                )
            }
            Err(e) => return Err(e.into()),
        };

        let created = fetch(&mut tx, id)
            .await?
            .ok_or_else(|| ApiError::Internal("inserted transaction row missing".to_string()))?;

        tx.commit().await?;
        Ok(created)
    }

    pub async fn update(&self, id: i64, changes: TransactionChanges) -> ApiResult<Transaction> {
        let mut tx = self.pool.begin().await?;

        let current = fetch(&mut tx, id).await?.ok_or(ApiError::NotFound {
            entity: "Transaction",
            id,
        })?;

        check_references(
            &mut tx,
            changes.posting_number,
            changes.account_id,
            changes.category_id,
        )
        .await?;

        let posting_number = changes.posting_number.unwrap_or(current.posting_number);
        let account_id = changes.account_id.unwrap_or(current.account.id);
        let category_id = changes.category_id.unwrap_or(current.category.id);
        let amount = changes.amount.unwrap_or(current.amount);
        let note = changes.note.unwrap_or(current.note);

        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET posting_num = ?, account_id = ?, category_id = ?, amount = ?, note = ?
            WHERE id = ?
            "#,
        )
        .bind(posting_number)
        .bind(account_id)
        .bind(category_id)
        .bind(amount.to_string())
        .bind(&note)
        .bind(id)
        .execute(&mut *tx)
        .await;
        match result {
            Ok(_) => {}
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(
                    ValidationErrors::single("body", "A referenced row no longer exists").into(),
                )
            }
            Err(e) => return Err(e.into()),
        }

        let updated = fetch(&mut tx, id)
            .await?
            .ok_or_else(|| ApiError::Internal("updated transaction row missing".to_string()))?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM transactions WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(ApiError::NotFound {
                entity: "Transaction",
                id,
            });
        }

        sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> ApiResult<Option<Transaction>> {
    let row: Option<TransactionRow> = sqlx::query_as(
        r#"
        SELECT t.id, t.posting_num, t.amount, t.note,
               a.id, a.name, a.created_date, a.account_type,
               c.id, c.name, c.created_date
        FROM transactions t
        JOIN accounts a ON a.id = t.account_id
        JOIN categories c ON c.id = t.category_id
        WHERE t.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(transaction_from_row).transpose()
}

/// Verify that every supplied reference points at an existing row,
/// collecting one error per dangling field.
async fn check_references(
    conn: &mut SqliteConnection,
    posting_number: Option<i64>,
    account_id: Option<i64>,
    category_id: Option<i64>,
) -> ApiResult<()> {
    let mut errors = ValidationErrors::new();

    if let Some(number) = posting_number {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT posting_num FROM postings WHERE posting_num = ?")
                .bind(number)
                .fetch_optional(&mut *conn)
                .await?;
        if found.is_none() {
            errors.add("postingNumber", format!("Posting {number} does not exist"));
        }
    }
    if let Some(id) = account_id {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        if found.is_none() {
            errors.add("accountId", format!("Account {id} does not exist"));
        }
    }
    if let Some(id) = category_id {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        if found.is_none() {
            errors.add("categoryId", format!("Category {id} does not exist"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

pub(crate) fn transaction_from_row(row: TransactionRow) -> ApiResult<Transaction> {
    let (
        id,
        posting_number,
        amount,
        note,
        account_id,
        account_name,
        account_created,
        account_type,
        category_id,
        category_name,
        category_created,
    ) = row;

    let amount = amount
        .parse()
        .map_err(|e| ApiError::Internal(format!("invalid amount in storage: {e}")))?;

    Ok(Transaction {
        id,
        posting_number,
        account: account_from_row((account_id, account_name, account_created, account_type))?,
        category: category_from_row((category_id, category_name, category_created)),
        amount,
        note,
    })
}
