//! Budget storage

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

use crate::domain::{Budget, BudgetChanges, NewBudget, ValidationErrors};
use crate::error::{is_foreign_key_violation, ApiError, ApiResult};

use super::categories::category_from_row;

type BudgetRow = (i64, u32, i32, String, i64, String, NaiveDate);

pub struct BudgetStore {
    pool: SqlitePool,
}

impl BudgetStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> ApiResult<Vec<Budget>> {
        let rows: Vec<BudgetRow> = sqlx::query_as(
            r#"
            SELECT b.id, b.month, b.year, b.amount,
                   c.id, c.name, c.created_date
            FROM budgets b
            JOIN categories c ON c.id = b.category_id
            ORDER BY b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(budget_from_row).collect()
    }

    pub async fn get(&self, id: i64) -> ApiResult<Option<Budget>> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await
    }

    pub async fn insert(&self, new: NewBudget) -> ApiResult<Budget> {
        let mut tx = self.pool.begin().await?;

        check_category(&mut tx, new.category_id).await?;

        let result = sqlx::query(
            "INSERT INTO budgets (month, year, category_id, amount) VALUES (?, ?, ?, ?)",
        )
        .bind(new.month)
        .bind(new.year)
        .bind(new.category_id)
        .bind(new.amount.to_string())
        .execute(&mut *tx)
        .await;

        let id = match result {
            Ok(done) => done.last_insert_rowid(),
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(ValidationErrors::single(
                    "categoryId",
                    format!("Category {} does not exist", new.category_id),
                )
                .into())
            }
            Err(e) => return Err(e.into()),
        };

        let created = fetch(&mut tx, id)
            .await?
            .ok_or_else(|| ApiError::Internal("inserted budget row missing".to_string()))?;

        tx.commit().await?;
        Ok(created)
    }

    pub async fn update(&self, id: i64, changes: BudgetChanges) -> ApiResult<Budget> {
        let mut tx = self.pool.begin().await?;

        let current = fetch(&mut tx, id).await?.ok_or(ApiError::NotFound {
            entity: "Budget",
            id,
        })?;

        if let Some(category_id) = changes.category_id {
            check_category(&mut tx, category_id).await?;
        }

        let month = changes.month.unwrap_or(current.month);
        let year = changes.year.unwrap_or(current.year);
        let category_id = changes.category_id.unwrap_or(current.category.id);
        let amount = changes.amount.unwrap_or(current.amount);

        let result = sqlx::query(
            "UPDATE budgets SET month = ?, year = ?, category_id = ?, amount = ? WHERE id = ?",
        )
        .bind(month)
        .bind(year)
        .bind(category_id)
        .bind(amount.to_string())
        .bind(id)
        .execute(&mut *tx)
        .await;
        match result {
            Ok(_) => {}
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(ValidationErrors::single(
                    "categoryId",
                    format!("Category {category_id} does not exist"),
                )
                .into())
            }
            Err(e) => return Err(e.into()),
        }

        let updated = fetch(&mut tx, id)
            .await?
            .ok_or_else(|| ApiError::Internal("updated budget row missing".to_string()))?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM budgets WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(ApiError::NotFound {
                entity: "Budget",
                id,
            });
        }

        sqlx::query("DELETE FROM budgets WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> ApiResult<Option<Budget>> {
    let row: Option<BudgetRow> = sqlx::query_as(
        r#"
        SELECT b.id, b.month, b.year, b.amount,
               c.id, c.name, c.created_date
        FROM budgets b
        JOIN categories c ON c.id = b.category_id
        WHERE b.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(budget_from_row).transpose()
}

async fn check_category(conn: &mut SqliteConnection, category_id: i64) -> ApiResult<()> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ?")
        .bind(category_id)
        .fetch_optional(&mut *conn)
        .await?;

    if found.is_none() {
        return Err(ValidationErrors::single(
            "categoryId",
            format!("Category {category_id} does not exist"),
        )
        .into());
    }
    Ok(())
}

fn budget_from_row(
    (id, month, year, amount, category_id, category_name, category_created): BudgetRow,
) -> ApiResult<Budget> {
    let amount = amount
        .parse()
        .map_err(|e| ApiError::Internal(format!("invalid amount in storage: {e}")))?;

    Ok(Budget {
        id,
        month,
        year,
        category: category_from_row((category_id, category_name, category_created)),
        amount,
    })
}
