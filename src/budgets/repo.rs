use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryBudget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    /// Always the first day of the budgeted month.
    pub month: Date,
    pub amount: Option<Decimal>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

const COLUMNS: &str = "id, user_id, category_id, month, amount, created_at, updated_at";

impl CategoryBudget {
    pub async fn list_for_month(
        db: &PgPool,
        user_id: Uuid,
        month: Date,
    ) -> sqlx::Result<Vec<CategoryBudget>> {
        sqlx::query_as::<_, CategoryBudget>(&format!(
            "SELECT {COLUMNS} FROM category_budgets WHERE user_id = $1 AND month = $2"
        ))
        .bind(user_id)
        .bind(month)
        .fetch_all(db)
        .await
    }

    /// One statement, one row per (user, category, month): a concurrent
    /// writer overwrites the amount instead of failing the constraint.
    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        category_id: Uuid,
        month: Date,
        amount: Option<Decimal>,
    ) -> sqlx::Result<CategoryBudget> {
        sqlx::query_as::<_, CategoryBudget>(&format!(
            r#"
            INSERT INTO category_budgets (user_id, category_id, month, amount)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, category_id, month)
            DO UPDATE SET amount = EXCLUDED.amount, updated_at = now()
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(category_id)
        .bind(month)
        .bind(amount)
        .fetch_one(db)
        .await
    }
}
