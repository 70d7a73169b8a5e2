use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::extractors::CurrentUser,
    dashboard::{
        dto::DashboardOverview,
        repo,
        services::{calculate_mom, normalize_month, shift_month, summarize_categories},
    },
    error::ApiError,
    incomes::repo::Income,
    state::AppState,
    wishlist::repo::WishlistItem,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard/overview", get(overview))
}

/// Assembles the monthly summary. Everything is anchored to "today" at
/// request time; reads only, no mutation.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn overview(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardOverview>, ApiError> {
    let today = OffsetDateTime::now_utc().date();
    let current_month_start = normalize_month(today);
    let previous_month_start = shift_month(current_month_start, -1);
    let previous_month_end = current_month_start
        .previous_day()
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("date underflow")))?;
    let trend_start = shift_month(current_month_start, -5);

    let monthly_expenses = repo::expenses_for_month(
        &state.db,
        user.id,
        current_month_start.year(),
        current_month_start.month() as u8,
    )
    .await?;
    let (total_expenses_month, expenses_by_category) = summarize_categories(&monthly_expenses);

    let total_expenses_previous = repo::expense_total_in_range(
        &state.db,
        user.id,
        previous_month_start,
        previous_month_end,
    )
    .await?;

    let (income_total_month, _) =
        Income::total_with_recurring(&state.db, user.id, current_month_start, today).await?;
    let (income_total_previous, _) = Income::total_with_recurring(
        &state.db,
        user.id,
        previous_month_start,
        previous_month_end,
    )
    .await?;

    let recent_transactions = repo::recent_expenses(&state.db, user.id, 10).await?;
    let (wishlist_total, wishlist_count) = WishlistItem::total(&state.db, user.id).await?;

    let monthly_category_spend =
        repo::monthly_category_spend(&state.db, user.id, trend_start).await?;
    let monthly_income = repo::monthly_income(&state.db, user.id, trend_start).await?;
    let monthly_savings = repo::monthly_savings(&state.db, user.id, trend_start).await?;

    Ok(Json(DashboardOverview {
        total_expenses_month,
        income_total_month,
        net_balance_month: income_total_month - total_expenses_month,
        expenses_mom_percentage: calculate_mom(total_expenses_month, total_expenses_previous),
        income_mom_percentage: calculate_mom(income_total_month, income_total_previous),
        expenses_by_category,
        monthly_category_spend,
        monthly_income,
        monthly_savings,
        recent_transactions,
        wishlist_total,
        wishlist_count,
    }))
}
