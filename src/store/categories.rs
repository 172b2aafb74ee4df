//! Category storage

use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;

use crate::domain::{Category, CategoryChanges, NewCategory, ValidationErrors};
use crate::error::{is_foreign_key_violation, is_unique_violation, ApiError, ApiResult};

use super::count_noun;

const NAME_TAKEN: &str = "A category with this name already exists";

pub struct CategoryStore {
    pool: SqlitePool,
}

impl CategoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> ApiResult<Vec<Category>> {
        let rows: Vec<(i64, String, NaiveDate)> =
            sqlx::query_as("SELECT id, name, created_date FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(category_from_row).collect())
    }

    pub async fn get(&self, id: i64) -> ApiResult<Option<Category>> {
        let row: Option<(i64, String, NaiveDate)> =
            sqlx::query_as("SELECT id, name, created_date FROM categories WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(category_from_row))
    }

    pub async fn insert(&self, new: NewCategory) -> ApiResult<Category> {
        let mut tx = self.pool.begin().await?;

        let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE name = ?")
            .bind(&new.name)
            .fetch_optional(&mut *tx)
            .await?;
        if taken.is_some() {
            return Err(ValidationErrors::single("name", NAME_TAKEN).into());
        }

        let created_date = Local::now().date_naive();
        let result = sqlx::query("INSERT INTO categories (name, created_date) VALUES (?, ?)")
            .bind(&new.name)
            .bind(created_date)
            .execute(&mut *tx)
            .await;

        let id = match result {
            Ok(done) => done.last_insert_rowid(),
            Err(e) if is_unique_violation(&e, "categories.name") => {
                return Err(ValidationErrors::single("name", NAME_TAKEN).into())
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;

        Ok(Category {
            id,
            name: new.name,
            created_date,
        })
    }

    pub async fn update(&self, id: i64, changes: CategoryChanges) -> ApiResult<Category> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(i64, String, NaiveDate)> =
            sqlx::query_as("SELECT id, name, created_date FROM categories WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let current = row.map(category_from_row).ok_or(ApiError::NotFound {
            entity: "Category",
            id,
        })?;

        let name = changes.name.unwrap_or(current.name);

        let taken: Option<i64> =
            sqlx::query_scalar("SELECT id FROM categories WHERE name = ? AND id != ?")
                .bind(&name)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if taken.is_some() {
            return Err(ValidationErrors::single("name", NAME_TAKEN).into());
        }

        let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
            .bind(&name)
            .bind(id)
            .execute(&mut *tx)
            .await;
        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e, "categories.name") => {
                return Err(ValidationErrors::single("name", NAME_TAKEN).into())
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;

        Ok(Category {
            id,
            name,
            created_date: current.created_date,
        })
    }

    /// Delete a category. Blocked while any transaction or budget still
    /// points at it.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(ApiError::NotFound {
                entity: "Category",
                id,
            });
        }

        let transactions: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE category_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        let budgets: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM budgets WHERE category_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        let mut parts = Vec::new();
        if transactions > 0 {
            parts.push(count_noun(transactions, "transaction"));
        }
        if budgets > 0 {
            parts.push(count_noun(budgets, "budget"));
        }
        if !parts.is_empty() {
            return Err(ApiError::Protected {
                entity: "Category",
                id,
                references: parts.join(", "),
            });
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await;
        match result {
            Ok(_) => {}
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(ApiError::Protected {
                    entity: "Category",
                    id,
                    references: "existing references".to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        Ok(())
    }
}

pub(crate) fn category_from_row((id, name, created_date): (i64, String, NaiveDate)) -> Category {
    Category {
        id,
        name,
        created_date,
    }
}
