use axum::{
    extract::{Path, State},
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
    state::AppState,
    wishlist::{
        dto::{PurchaseResponse, WishlistCreate, WishlistPurchase, WishlistTotal, WishlistUpdate},
        repo::WishlistItem,
        services::convert_to_expense,
    },
};

pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/wishlist", get(list_items).post(create_item))
        .route("/wishlist/total", get(wishlist_total))
        .route(
            "/wishlist/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/wishlist/:id/purchase", axum::routing::post(purchase_item))
}

fn check_price(price: Decimal) -> Result<(), ApiError> {
    if price <= Decimal::ZERO {
        return Err(ApiError::validation("price must be greater than zero"));
    }
    Ok(())
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_items(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<WishlistItem>>, ApiError> {
    let items = WishlistItem::list(&state.db, user.id).await?;
    Ok(Json(items))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<WishlistCreate>,
) -> Result<(StatusCode, Json<WishlistItem>), ApiError> {
    check_price(payload.price)?;

    // Best-effort preview lookup; a failed fetch just means no image.
    let image_url = match (&payload.image_url, &payload.url) {
        (Some(explicit), _) => Some(explicit.clone()),
        (None, Some(url)) => state.preview.fetch_preview_image(url).await,
        (None, None) => None,
    };

    let item = WishlistItem::create(
        &state.db,
        user.id,
        &payload.item_name,
        payload.price,
        payload.url.as_deref(),
        image_url.as_deref(),
        payload.notes.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn wishlist_total(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<WishlistTotal>, ApiError> {
    let (total, count) = WishlistItem::total(&state.db, user.id).await?;
    Ok(Json(WishlistTotal { total, count }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<Uuid>,
) -> Result<Json<WishlistItem>, ApiError> {
    let item = WishlistItem::find(&state.db, user.id, item_id)
        .await?
        .ok_or(ApiError::NotFound("Wishlist item not found"))?;
    Ok(Json(item))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<WishlistUpdate>,
) -> Result<Json<WishlistItem>, ApiError> {
    if let Some(price) = payload.price {
        check_price(price)?;
    }

    let item = WishlistItem::find(&state.db, user.id, item_id)
        .await?
        .ok_or(ApiError::NotFound("Wishlist item not found"))?;

    // A new URL without an explicit image triggers a fresh preview lookup.
    let image_url = match (&payload.image_url, &payload.url) {
        (Some(explicit), _) => Some(explicit.clone()),
        (None, Some(url)) => state.preview.fetch_preview_image(url).await,
        (None, None) => item.image_url.clone(),
    };

    let updated = item.update(&state.db, &payload, image_url.as_deref()).await?;
    Ok(Json(updated))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !WishlistItem::delete(&state.db, user.id, item_id).await? {
        return Err(ApiError::NotFound("Wishlist item not found"));
    }
    Ok(Json(
        serde_json::json!({ "message": "Wishlist item deleted successfully" }),
    ))
}

/// Converts the item into an expense and removes it, atomically.
#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn purchase_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<WishlistPurchase>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let item = WishlistItem::find(&state.db, user.id, item_id)
        .await?
        .ok_or(ApiError::NotFound("Wishlist item not found"))?;

    let expense = convert_to_expense(
        &state,
        user.id,
        &item,
        payload.purchase_date,
        payload.category.as_deref(),
    )
    .await?;

    Ok(Json(PurchaseResponse {
        expense_id: expense.id,
        message: "Item marked as purchased and added to expenses",
    }))
}
