use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::expenses::dto::{ExpenseFilter, ExpenseUpdate};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    /// Free-text label, not a category foreign key.
    pub category: String,
    pub date: Date,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

const COLUMNS: &str = "id, user_id, amount, category, date, description, created_at, updated_at";

impl Expense {
    pub async fn list(
        db: &PgPool,
        user_id: Uuid,
        filter: &ExpenseFilter,
    ) -> sqlx::Result<Vec<Expense>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM expenses WHERE user_id = "
        ));
        query.push_bind(user_id);
        if let Some(date_from) = filter.date_from {
            query.push(" AND date >= ").push_bind(date_from);
        }
        if let Some(date_to) = filter.date_to {
            query.push(" AND date <= ").push_bind(date_to);
        }
        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category);
        }
        query
            .push(" ORDER BY date DESC, created_at DESC LIMIT ")
            .push_bind(filter.limit.clamp(1, 100))
            .push(" OFFSET ")
            .push_bind(filter.skip.max(0));

        query.build_query_as::<Expense>().fetch_all(db).await
    }

    pub async fn find(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<Option<Expense>> {
        sqlx::query_as::<_, Expense>(&format!(
            "SELECT {COLUMNS} FROM expenses WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        amount: Decimal,
        category: &str,
        date: Date,
        description: Option<&str>,
    ) -> sqlx::Result<Expense> {
        sqlx::query_as::<_, Expense>(&format!(
            r#"
            INSERT INTO expenses (user_id, amount, category, date, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(amount)
        .bind(category)
        .bind(date)
        .bind(description)
        .fetch_one(db)
        .await
    }

    /// Variant of `create` running inside a caller-owned transaction; used by
    /// the wishlist purchase flow so both writes commit or roll back together.
    pub async fn create_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        amount: Decimal,
        category: &str,
        date: Date,
        description: Option<&str>,
    ) -> sqlx::Result<Expense> {
        sqlx::query_as::<_, Expense>(&format!(
            r#"
            INSERT INTO expenses (user_id, amount, category, date, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(amount)
        .bind(category)
        .bind(date)
        .bind(description)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn update(&self, db: &PgPool, changes: &ExpenseUpdate) -> sqlx::Result<Expense> {
        sqlx::query_as::<_, Expense>(&format!(
            r#"
            UPDATE expenses
            SET amount = $2, category = $3, date = $4, description = $5, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(self.id)
        .bind(changes.amount.unwrap_or(self.amount))
        .bind(changes.category.as_deref().unwrap_or(&self.category))
        .bind(changes.date.unwrap_or(self.date))
        .bind(changes.description.as_deref().or(self.description.as_deref()))
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_in_range(
        db: &PgPool,
        user_id: Uuid,
        date_from: Option<Date>,
        date_to: Option<Date>,
    ) -> sqlx::Result<Vec<Expense>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM expenses WHERE user_id = "
        ));
        query.push_bind(user_id);
        if let Some(date_from) = date_from {
            query.push(" AND date >= ").push_bind(date_from);
        }
        if let Some(date_to) = date_to {
            query.push(" AND date <= ").push_bind(date_to);
        }
        query.build_query_as::<Expense>().fetch_all(db).await
    }
}
