//! Account storage

use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;

use crate::domain::{Account, AccountChanges, AccountType, NewAccount, ValidationErrors};
use crate::error::{is_foreign_key_violation, is_unique_violation, ApiError, ApiResult};

use super::count_noun;

const NAME_TAKEN: &str = "An account with this name already exists";

pub struct AccountStore {
    pool: SqlitePool,
}

impl AccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> ApiResult<Vec<Account>> {
        let rows: Vec<(i64, String, NaiveDate, String)> = sqlx::query_as(
            "SELECT id, name, created_date, account_type FROM accounts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(account_from_row).collect()
    }

    pub async fn get(&self, id: i64) -> ApiResult<Option<Account>> {
        let row: Option<(i64, String, NaiveDate, String)> = sqlx::query_as(
            "SELECT id, name, created_date, account_type FROM accounts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(account_from_row).transpose()
    }

    /// Insert a new account. `created_date` is assigned here, once, and is
    /// never written again by any other operation.
    pub async fn insert(&self, new: NewAccount) -> ApiResult<Account> {
        let mut tx = self.pool.begin().await?;

        let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM accounts WHERE name = ?")
            .bind(&new.name)
            .fetch_optional(&mut *tx)
            .await?;
        if taken.is_some() {
            return Err(ValidationErrors::single("name", NAME_TAKEN).into());
        }

        let created_date = Local::now().date_naive();
        let result =
            sqlx::query("INSERT INTO accounts (name, created_date, account_type) VALUES (?, ?, ?)")
                .bind(&new.name)
                .bind(created_date)
                .bind(new.account_type.as_str())
                .execute(&mut *tx)
                .await;

        let id = match result {
            Ok(done) => done.last_insert_rowid(),
            Err(e) if is_unique_violation(&e, "accounts.name") => {
                return Err(ValidationErrors::single("name", NAME_TAKEN).into())
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;

        Ok(Account {
            id,
            name: new.name,
            created_date,
            account_type: new.account_type,
        })
    }

    pub async fn update(&self, id: i64, changes: AccountChanges) -> ApiResult<Account> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(i64, String, NaiveDate, String)> = sqlx::query_as(
            "SELECT id, name, created_date, account_type FROM accounts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let current = row
            .map(account_from_row)
            .transpose()?
            .ok_or(ApiError::NotFound {
                entity: "Account",
                id,
            })?;

        let name = changes.name.unwrap_or(current.name);
        let account_type = changes.account_type.unwrap_or(current.account_type);

        let taken: Option<i64> =
            sqlx::query_scalar("SELECT id FROM accounts WHERE name = ? AND id != ?")
                .bind(&name)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if taken.is_some() {
            return Err(ValidationErrors::single("name", NAME_TAKEN).into());
        }

        let result = sqlx::query("UPDATE accounts SET name = ?, account_type = ? WHERE id = ?")
            .bind(&name)
            .bind(account_type.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await;
        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e, "accounts.name") => {
                return Err(ValidationErrors::single("name", NAME_TAKEN).into())
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;

        Ok(Account {
            id,
            name,
            created_date: current.created_date,
            account_type,
        })
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(ApiError::NotFound {
                entity: "Account",
                id,
            });
        }

        let referencing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE account_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if referencing > 0 {
            return Err(ApiError::Protected {
                entity: "Account",
                id,
                references: count_noun(referencing, "transaction"),
            });
        }

        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await;
        match result {
            Ok(_) => {}
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(ApiError::Protected {
                    entity: "Account",
                    id,
                    references: "existing transactions".to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Convert a raw account row, rejecting enum values the schema should have
/// kept out.
pub(crate) fn account_from_row(
    (id, name, created_date, account_type): (i64, String, NaiveDate, String),
) -> ApiResult<Account> {
    let account_type = AccountType::from_str(&account_type).ok_or_else(|| {
        ApiError::Internal(format!("unknown account type in storage: {account_type}"))
    })?;

    Ok(Account {
        id,
        name,
        created_date,
        account_type,
    })
}
