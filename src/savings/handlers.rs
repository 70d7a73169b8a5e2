use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::extractors::CurrentUser,
    dashboard::services::normalize_month,
    error::ApiError,
    savings::{
        dto::{MonthQuery, SavingsUpsert},
        repo::Savings,
    },
    state::AppState,
};

pub fn savings_routes() -> Router<AppState> {
    Router::new().route("/savings", get(get_savings).put(upsert_savings))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_savings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Option<Savings>>, ApiError> {
    let month = normalize_month(
        query
            .month
            .unwrap_or_else(|| OffsetDateTime::now_utc().date()),
    );
    let savings = Savings::find_for_month(&state.db, user.id, month).await?;
    Ok(Json(savings))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn upsert_savings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<SavingsUpsert>,
) -> Result<Json<Savings>, ApiError> {
    let month = normalize_month(payload.month);
    let savings = Savings::upsert(&state.db, user.id, month, payload.amount).await?;
    Ok(Json(savings))
}
