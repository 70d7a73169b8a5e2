use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    dashboard::services::normalize_month,
    error::ApiError,
    incomes::{
        dto::{IncomeCreate, IncomeFilter, IncomeTotal, IncomeUpdate},
        repo::Income,
    },
    state::AppState,
};

pub fn income_routes() -> Router<AppState> {
    Router::new()
        .route("/incomes", get(list_incomes).post(create_income))
        .route("/incomes/total", get(income_total))
        .route(
            "/incomes/:id",
            get(get_income).put(update_income).delete(delete_income),
        )
}

fn check_amount(amount: Decimal) -> Result<(), ApiError> {
    if amount <= Decimal::ZERO {
        return Err(ApiError::validation("amount must be greater than zero"));
    }
    Ok(())
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_incomes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<IncomeFilter>,
) -> Result<Json<Vec<Income>>, ApiError> {
    let incomes = Income::list(&state.db, user.id, &filter).await?;
    Ok(Json(incomes))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_income(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<IncomeCreate>,
) -> Result<(StatusCode, Json<Income>), ApiError> {
    check_amount(payload.amount)?;

    let income = Income::create(
        &state.db,
        user.id,
        &payload.source,
        payload.amount,
        payload.date,
        payload.is_recurring,
        payload.frequency.as_deref(),
        payload.notes.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(income)))
}

/// Current-month total, recurring incomes included.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn income_total(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<IncomeTotal>, ApiError> {
    let today = OffsetDateTime::now_utc().date();
    let month_start = normalize_month(today);

    let (total, count) =
        Income::total_with_recurring(&state.db, user.id, month_start, today).await?;
    Ok(Json(IncomeTotal { total, count }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_income(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(income_id): Path<Uuid>,
) -> Result<Json<Income>, ApiError> {
    let income = Income::find(&state.db, user.id, income_id)
        .await?
        .ok_or(ApiError::NotFound("Income record not found"))?;
    Ok(Json(income))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_income(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(income_id): Path<Uuid>,
    Json(payload): Json<IncomeUpdate>,
) -> Result<Json<Income>, ApiError> {
    if let Some(amount) = payload.amount {
        check_amount(amount)?;
    }

    let income = Income::find(&state.db, user.id, income_id)
        .await?
        .ok_or(ApiError::NotFound("Income record not found"))?;

    let updated = income.update(&state.db, &payload).await?;
    Ok(Json(updated))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_income(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(income_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !Income::delete(&state.db, user.id, income_id).await? {
        return Err(ApiError::NotFound("Income record not found"));
    }
    Ok(Json(
        serde_json::json!({ "message": "Income record deleted successfully" }),
    ))
}
