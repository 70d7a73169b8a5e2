use rust_decimal::Decimal;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::dashboard::dto::{MonthlyAmount, MonthlyCategorySpend};
use crate::dashboard::services::month_start;
use crate::expenses::repo::Expense;

/// Expenses dated anywhere in the given calendar month, matched by year and
/// month rather than a day range.
pub async fn expenses_for_month(
    db: &PgPool,
    user_id: Uuid,
    year: i32,
    month: u8,
) -> sqlx::Result<Vec<Expense>> {
    sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, user_id, amount, category, date, description, created_at, updated_at
        FROM expenses
        WHERE user_id = $1
          AND EXTRACT(YEAR FROM date) = $2
          AND EXTRACT(MONTH FROM date) = $3
        "#,
    )
    .bind(user_id)
    .bind(year)
    .bind(i32::from(month))
    .fetch_all(db)
    .await
}

pub async fn expense_total_in_range(
    db: &PgPool,
    user_id: Uuid,
    date_from: Date,
    date_to: Date,
) -> sqlx::Result<Decimal> {
    let row: (Option<Decimal>,) = sqlx::query_as(
        "SELECT SUM(amount) FROM expenses WHERE user_id = $1 AND date >= $2 AND date <= $3",
    )
    .bind(user_id)
    .bind(date_from)
    .bind(date_to)
    .fetch_one(db)
    .await?;
    Ok(row.0.unwrap_or_default())
}

pub async fn recent_expenses(db: &PgPool, user_id: Uuid, limit: i64) -> sqlx::Result<Vec<Expense>> {
    sqlx::query_as::<_, Expense>(
        r#"
        SELECT id, user_id, amount, category, date, description, created_at, updated_at
        FROM expenses
        WHERE user_id = $1
        ORDER BY date DESC, created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
}

/// Per-(month, category) expense sums from `trend_start` on, ascending.
pub async fn monthly_category_spend(
    db: &PgPool,
    user_id: Uuid,
    trend_start: Date,
) -> sqlx::Result<Vec<MonthlyCategorySpend>> {
    let rows: Vec<(i32, i32, String, Decimal)> = sqlx::query_as(
        r#"
        SELECT CAST(EXTRACT(YEAR FROM date) AS INT) AS year,
               CAST(EXTRACT(MONTH FROM date) AS INT) AS month,
               category,
               SUM(amount) AS total
        FROM expenses
        WHERE user_id = $1 AND date >= $2
        GROUP BY 1, 2, 3
        ORDER BY 1, 2
        "#,
    )
    .bind(user_id)
    .bind(trend_start)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(year, month, category, total)| {
            Some(MonthlyCategorySpend {
                month: month_start(year, month as u8)?,
                category,
                total,
            })
        })
        .collect())
}

/// Per-month income sums from `trend_start` on, ascending.
pub async fn monthly_income(
    db: &PgPool,
    user_id: Uuid,
    trend_start: Date,
) -> sqlx::Result<Vec<MonthlyAmount>> {
    let rows: Vec<(i32, i32, Decimal)> = sqlx::query_as(
        r#"
        SELECT CAST(EXTRACT(YEAR FROM date) AS INT) AS year,
               CAST(EXTRACT(MONTH FROM date) AS INT) AS month,
               SUM(amount) AS total
        FROM incomes
        WHERE user_id = $1 AND date >= $2
        GROUP BY 1, 2
        ORDER BY 1, 2
        "#,
    )
    .bind(user_id)
    .bind(trend_start)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(year, month, total)| {
            Some(MonthlyAmount {
                month: month_start(year, month as u8)?,
                total,
            })
        })
        .collect())
}

/// Per-month savings sums from `trend_start` on, ascending. Placeholder rows
/// with no amount set are left out of the series.
pub async fn monthly_savings(
    db: &PgPool,
    user_id: Uuid,
    trend_start: Date,
) -> sqlx::Result<Vec<MonthlyAmount>> {
    let rows: Vec<(i32, i32, Decimal)> = sqlx::query_as(
        r#"
        SELECT CAST(EXTRACT(YEAR FROM month) AS INT) AS year,
               CAST(EXTRACT(MONTH FROM month) AS INT) AS month,
               SUM(amount) AS total
        FROM savings
        WHERE user_id = $1 AND month >= $2 AND amount IS NOT NULL
        GROUP BY 1, 2
        ORDER BY 1, 2
        "#,
    )
    .bind(user_id)
    .bind(trend_start)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(year, month, total)| {
            Some(MonthlyAmount {
                month: month_start(year, month as u8)?,
                total,
            })
        })
        .collect())
}
