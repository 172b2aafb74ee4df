//! Posting storage
//!
//! Posting reads carry their transaction lines, so the list endpoint
//! fetches all lines once and distributes them instead of querying per
//! posting.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

use crate::domain::{NewPosting, Posting, PostingChanges, PostingType, Transaction, ValidationErrors};
use crate::error::{is_foreign_key_violation, is_unique_violation, ApiError, ApiResult};

use super::count_noun;
use super::transactions::{transaction_from_row, TransactionRow};

const NUMBER_TAKEN: &str = "A posting with this number already exists";

type PostingRow = (i64, NaiveDate, String, String, bool, String);

pub struct PostingStore {
    pool: SqlitePool,
}

impl PostingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> ApiResult<Vec<Posting>> {
        let rows: Vec<PostingRow> = sqlx::query_as(
            r#"
            SELECT posting_num, date, posting_type, payee, cleared, note
            FROM postings
            ORDER BY posting_num
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let lines: Vec<TransactionRow> = sqlx::query_as(
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

        let mut by_posting: HashMap<i64, Vec<Transaction>> = HashMap::new();
        for line in lines {
            let transaction = transaction_from_row(line)?;
            by_posting
                .entry(transaction.posting_number)
                .or_default()
                .push(transaction);
        }

        rows.into_iter()
            .map(|row| {
                let mut posting = posting_from_row(row)?;
                posting.transactions = by_posting
                    .remove(&posting.posting_number)
                    .unwrap_or_default();
                Ok(posting)
            })
            .collect()
    }

    pub async fn get(&self, posting_number: i64) -> ApiResult<Option<Posting>> {
        let mut conn = self.pool.acquire().await?;

        let row: Option<PostingRow> = sqlx::query_as(
            r#"
            SELECT posting_num, date, posting_type, payee, cleared, note
            FROM postings
            WHERE posting_num = ?
            "#,
        )
        .bind(posting_number)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => {
                let mut posting = posting_from_row(row)?;
                posting.transactions = fetch_lines(&mut conn, posting_number).await?;
                Ok(Some(posting))
            }
            None => Ok(None),
        }
    }

    pub async fn insert(&self, new: NewPosting) -> ApiResult<Posting> {
        let mut tx = self.pool.begin().await?;

        let taken: Option<i64> =
            sqlx::query_scalar("SELECT posting_num FROM postings WHERE posting_num = ?")
                .bind(new.posting_number)
                .fetch_optional(&mut *tx)
                .await?;
        if taken.is_some() {
            return Err(ValidationErrors::single("postingNumber", NUMBER_TAKEN).into());
        }

        let result = sqlx::query(
            r#"
            INSERT INTO postings (posting_num, date, posting_type, payee, cleared, note)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.posting_number)
        .bind(new.date)
        .bind(new.posting_type.as_str())
        .bind(&new.payee)
        .bind(new.cleared)
        .bind(&new.note)
        .execute(&mut *tx)
        .await;
        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e, "postings.posting_num") => {
                return Err(ValidationErrors::single("postingNumber", NUMBER_TAKEN).into())
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;

        Ok(Posting {
            posting_number: new.posting_number,
            date: new.date,
            posting_type: new.posting_type,
            payee: new.payee,
            cleared: new.cleared,
            note: new.note,
            transactions: vec![],
        })
    }

    pub async fn update(&self, posting_number: i64, changes: PostingChanges) -> ApiResult<Posting> {
        let mut tx = self.pool.begin().await?;

        let row: Option<PostingRow> = sqlx::query_as(
            r#"
            SELECT posting_num, date, posting_type, payee, cleared, note
            FROM postings
            WHERE posting_num = ?
            "#,
        )
        .bind(posting_number)
        .fetch_optional(&mut *tx)
        .await?;
        let current = row
            .map(posting_from_row)
            .transpose()?
            .ok_or(ApiError::NotFound {
                entity: "Posting",
                id: posting_number,
            })?;

        let date = changes.date.unwrap_or(current.date);
        let posting_type = changes.posting_type.unwrap_or(current.posting_type);
        let payee = changes.payee.unwrap_or(current.payee);
        let cleared = changes.cleared.unwrap_or(current.cleared);
        let note = changes.note.unwrap_or(current.note);

        sqlx::query(
            r#"
            UPDATE postings
            SET date = ?, posting_type = ?, payee = ?, cleared = ?, note = ?
            WHERE posting_num = ?
            "#,
        )
        .bind(date)
        .bind(posting_type.as_str())
        .bind(&payee)
        .bind(cleared)
        .bind(&note)
        .bind(posting_number)
        .execute(&mut *tx)
        .await?;

        let transactions = fetch_lines(&mut tx, posting_number).await?;

        tx.commit().await?;

        Ok(Posting {
            posting_number,
            date,
            posting_type,
            payee,
            cleared,
            note,
            transactions,
        })
    }

    pub async fn delete(&self, posting_number: i64) -> ApiResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT posting_num FROM postings WHERE posting_num = ?")
                .bind(posting_number)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(ApiError::NotFound {
                entity: "Posting",
                id: posting_number,
            });
        }

        let referencing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE posting_num = ?")
                .bind(posting_number)
                .fetch_one(&mut *tx)
                .await?;
        if referencing > 0 {
            return Err(ApiError::Protected {
                entity: "Posting",
                id: posting_number,
                references: count_noun(referencing, "transaction"),
            });
        }

        let result = sqlx::query("DELETE FROM postings WHERE posting_num = ?")
            .bind(posting_number)
            .execute(&mut *tx)
            .await;
        match result {
            Ok(_) => {}
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(ApiError::Protected {
                    entity: "Posting",
                    id: posting_number,
                    references: "existing transactions".to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        Ok(())
    }
}

async fn fetch_lines(
    conn: &mut SqliteConnection,
    posting_number: i64,
) -> ApiResult<Vec<Transaction>> {
    let rows: Vec<TransactionRow> = sqlx::query_as(
        r#"
        SELECT t.id, t.posting_num, t.amount, t.note,
               a.id, a.name, a.created_date, a.account_type,
               c.id, c.name, c.created_date
        FROM transactions t
        JOIN accounts a ON a.id = t.account_id
        JOIN categories c ON c.id = t.category_id
        WHERE t.posting_num = ?
        ORDER BY t.id
        "#,
    )
    .bind(posting_number)
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(transaction_from_row).collect()
}

fn posting_from_row(
    (posting_number, date, posting_type, payee, cleared, note): PostingRow,
) -> ApiResult<Posting> {
    let posting_type = PostingType::from_str(&posting_type).ok_or_else(|| {
        ApiError::Internal(format!("unknown posting type in storage: {posting_type}"))
    })?;

    Ok(Posting {
        posting_number,
        date,
        posting_type,
        payee,
        cleared,
        note,
        transactions: vec![],
    })
}
