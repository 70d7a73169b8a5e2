use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::incomes::dto::{IncomeFilter, IncomeUpdate};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Income {
    pub id: Uuid,
    pub user_id: Uuid,
    pub source: String,
    pub amount: Decimal,
    pub date: Date,
    pub is_recurring: bool,
    pub frequency: Option<String>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

const COLUMNS: &str =
    "id, user_id, source, amount, date, is_recurring, frequency, notes, created_at, updated_at";

impl Income {
    pub async fn list(
        db: &PgPool,
        user_id: Uuid,
        filter: &IncomeFilter,
    ) -> sqlx::Result<Vec<Income>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM incomes WHERE user_id = "
        ));
        query.push_bind(user_id);
        if let Some(date_from) = filter.date_from {
            query.push(" AND date >= ").push_bind(date_from);
        }
        if let Some(date_to) = filter.date_to {
            query.push(" AND date <= ").push_bind(date_to);
        }
        if let Some(is_recurring) = filter.is_recurring {
            query.push(" AND is_recurring = ").push_bind(is_recurring);
        }
        query
            .push(" ORDER BY date DESC, created_at DESC LIMIT ")
            .push_bind(filter.limit.clamp(1, 100))
            .push(" OFFSET ")
            .push_bind(filter.skip.max(0));

        query.build_query_as::<Income>().fetch_all(db).await
    }

    pub async fn find(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<Option<Income>> {
        sqlx::query_as::<_, Income>(&format!(
            "SELECT {COLUMNS} FROM incomes WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        source: &str,
        amount: Decimal,
        date: Date,
        is_recurring: bool,
        frequency: Option<&str>,
        notes: Option<&str>,
    ) -> sqlx::Result<Income> {
        sqlx::query_as::<_, Income>(&format!(
            r#"
            INSERT INTO incomes (user_id, source, amount, date, is_recurring, frequency, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(source)
        .bind(amount)
        .bind(date)
        .bind(is_recurring)
        .bind(frequency)
        .bind(notes)
        .fetch_one(db)
        .await
    }

    pub async fn update(&self, db: &PgPool, changes: &IncomeUpdate) -> sqlx::Result<Income> {
        sqlx::query_as::<_, Income>(&format!(
            r#"
            UPDATE incomes
            SET source = $2, amount = $3, date = $4, is_recurring = $5,
                frequency = $6, notes = $7, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(self.id)
        .bind(changes.source.as_deref().unwrap_or(&self.source))
        .bind(changes.amount.unwrap_or(self.amount))
        .bind(changes.date.unwrap_or(self.date))
        .bind(changes.is_recurring.unwrap_or(self.is_recurring))
        .bind(changes.frequency.as_deref().or(self.frequency.as_deref()))
        .bind(changes.notes.as_deref().or(self.notes.as_deref()))
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM incomes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total and row count for a month window. A recurring income counts from
    /// its date onward, so anything recurring dated on or before the window
    /// end is included even when the date is outside the window. The WHERE
    /// clause must stay in lockstep with `services::counts_in_window`.
    pub async fn total_with_recurring(
        db: &PgPool,
        user_id: Uuid,
        window_start: Date,
        window_end: Date,
    ) -> sqlx::Result<(Decimal, i64)> {
        let row: (Option<Decimal>, i64) = sqlx::query_as(
            r#"
            SELECT SUM(amount), COUNT(id)
            FROM incomes
            WHERE user_id = $1
              AND ((date >= $2 AND date <= $3) OR (is_recurring AND date <= $3))
            "#,
        )
        .bind(user_id)
        .bind(window_start)
        .bind(window_end)
        .fetch_one(db)
        .await?;
        Ok((row.0.unwrap_or_default(), row.1))
    }
}
