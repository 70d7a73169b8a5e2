use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    error::ApiError,
    expenses::{
        dto::{ExpenseCreate, ExpenseFilter, ExpenseStats, ExpenseUpdate},
        repo::Expense,
    },
    state::AppState,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/stats", get(expense_stats))
        .route(
            "/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

fn check_amount(amount: Decimal) -> Result<(), ApiError> {
    if amount <= Decimal::ZERO {
        return Err(ApiError::validation("amount must be greater than zero"));
    }
    Ok(())
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_expenses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<ExpenseFilter>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = Expense::list(&state.db, user.id, &filter).await?;
    Ok(Json(expenses))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ExpenseCreate>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    check_amount(payload.amount)?;

    let expense = Expense::create(
        &state.db,
        user.id,
        payload.amount,
        &payload.category,
        payload.date,
        payload.description.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn expense_stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<ExpenseFilter>,
) -> Result<Json<ExpenseStats>, ApiError> {
    let expenses =
        Expense::list_in_range(&state.db, user.id, filter.date_from, filter.date_to).await?;
    Ok(Json(stats_from(&expenses)))
}

fn stats_from(expenses: &[Expense]) -> ExpenseStats {
    let mut by_category: HashMap<String, Decimal> = HashMap::new();
    let mut total = Decimal::ZERO;
    for expense in expenses {
        total += expense.amount;
        *by_category.entry(expense.category.clone()).or_default() += expense.amount;
    }
    ExpenseStats {
        total,
        by_category,
        count: expenses.len(),
    }
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<Expense>, ApiError> {
    let expense = Expense::find(&state.db, user.id, expense_id)
        .await?
        .ok_or(ApiError::NotFound("Expense not found"))?;
    Ok(Json(expense))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<Expense>, ApiError> {
    if let Some(amount) = payload.amount {
        check_amount(amount)?;
    }

    let expense = Expense::find(&state.db, user.id, expense_id)
        .await?
        .ok_or(ApiError::NotFound("Expense not found"))?;

    let updated = expense.update(&state.db, &payload).await?;
    Ok(Json(updated))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !Expense::delete(&state.db, user.id, expense_id).await? {
        return Err(ApiError::NotFound("Expense not found"));
    }
    Ok(Json(
        serde_json::json!({ "message": "Expense deleted successfully" }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::date;
    use time::OffsetDateTime;

    fn expense(category: &str, amount: Decimal) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount,
            category: category.to_string(),
            date: date!(2026 - 08 - 10),
            description: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        }
    }

    #[test]
    fn stats_group_by_category() {
        let expenses = vec![
            expense("Food", dec!(50.00)),
            expense("Food", dec!(12.50)),
            expense("Transport", dec!(30.00)),
        ];
        let stats = stats_from(&expenses);
        assert_eq!(stats.total, dec!(92.50));
        assert_eq!(stats.count, 3);
        assert_eq!(stats.by_category["Food"], dec!(62.50));
        assert_eq!(stats.by_category["Transport"], dec!(30.00));
    }

    #[test]
    fn stats_empty() {
        let stats = stats_from(&[]);
        assert_eq!(stats.total, Decimal::ZERO);
        assert_eq!(stats.count, 0);
        assert!(stats.by_category.is_empty());
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(check_amount(dec!(0.01)).is_ok());
        assert!(check_amount(Decimal::ZERO).is_err());
        assert!(check_amount(dec!(-5)).is_err());
    }
}
