use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::extractors::CurrentUser,
    budgets::{
        dto::{BudgetUpsert, MonthQuery},
        repo::CategoryBudget,
    },
    categories::repo::Category,
    dashboard::services::normalize_month,
    error::ApiError,
    state::AppState,
};

pub fn budget_routes() -> Router<AppState> {
    Router::new().route("/budgets", get(list_budgets).put(upsert_budget))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_budgets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryBudget>>, ApiError> {
    let month = normalize_month(
        query
            .month
            .unwrap_or_else(|| OffsetDateTime::now_utc().date()),
    );
    let budgets = CategoryBudget::list_for_month(&state.db, user.id, month).await?;
    Ok(Json(budgets))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn upsert_budget(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<BudgetUpsert>,
) -> Result<Json<CategoryBudget>, ApiError> {
    let month = normalize_month(payload.month);

    // The category must be visible to the caller: a global default or one of
    // their own. Foreign ids read as not-found so other tenants' categories
    // stay invisible.
    let category = Category::find_by_id(&state.db, payload.category_id).await?;
    let visible = matches!(&category, Some(c) if c.user_id.is_none() || c.user_id == Some(user.id));
    if !visible {
        return Err(ApiError::NotFound("Category not found"));
    }

    let budget = CategoryBudget::upsert(
        &state.db,
        user.id,
        payload.category_id,
        month,
        payload.amount,
    )
    .await?;
    Ok(Json(budget))
}
