use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Savings {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Always the first day of the month.
    pub month: Date,
    /// A row may exist as a placeholder with no amount set.
    pub amount: Option<Decimal>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

const COLUMNS: &str = "id, user_id, month, amount, created_at, updated_at";

impl Savings {
    pub async fn find_for_month(
        db: &PgPool,
        user_id: Uuid,
        month: Date,
    ) -> sqlx::Result<Option<Savings>> {
        sqlx::query_as::<_, Savings>(&format!(
            "SELECT {COLUMNS} FROM savings WHERE user_id = $1 AND month = $2"
        ))
        .bind(user_id)
        .bind(month)
        .fetch_optional(db)
        .await
    }

    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        month: Date,
        amount: Option<Decimal>,
    ) -> sqlx::Result<Savings> {
        sqlx::query_as::<_, Savings>(&format!(
            r#"
            INSERT INTO savings (user_id, month, amount)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, month)
            DO UPDATE SET amount = EXCLUDED.amount, updated_at = now()
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(month)
        .bind(amount)
        .fetch_one(db)
        .await
    }
}
