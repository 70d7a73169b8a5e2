use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    categories::{
        dto::{CategoryCreate, CategoryResponse, CategoryUpdate},
        repo::Category,
        services::{apply_update, merge_visible, missing_defaults},
    },
    error::{is_unique_violation, ApiError},
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_categories(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let customs = Category::list_custom(&state.db, user.id).await?;
    let mut defaults = Category::list_defaults(&state.db).await?;

    let missing = missing_defaults(&defaults);
    if !missing.is_empty() {
        info!(count = missing.len(), "seeding default categories");
        Category::seed_defaults(&state.db, &missing).await?;
        defaults = Category::list_defaults(&state.db).await?;
    }

    let visible = merge_visible(defaults, customs);
    Ok(Json(visible.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("name cannot be empty"));
    }

    if Category::find_custom_by_name(&state.db, user.id, &payload.name)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("Category with this name already exists"));
    }

    let category = Category::create_custom(
        &state.db,
        user.id,
        &payload.name,
        &payload.icon,
        &payload.color,
        payload.budget_monthly,
    )
    .await
    .map_err(|e| ApiError::conflict_on_unique(e, "Category with this name already exists"))?;

    Ok((StatusCode::CREATED, Json(category.into())))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryResponse>, ApiError> {
    // Simplest case first: the id names a row the user already owns.
    if let Some(owned) = Category::find_custom(&state.db, user.id, category_id).await? {
        let fields = apply_update(&owned, &payload)?;
        let updated = save_fields(&state, owned.id, fields).await?;
        return Ok(Json(updated.into()));
    }

    // Otherwise it must be a global default; overriding one never mutates
    // the shared row.
    let default = Category::find_default(&state.db, category_id)
        .await?
        .ok_or(ApiError::NotFound("Category not found"))?;

    // An earlier override for the same name absorbs the update instead of
    // creating a duplicate.
    if let Some(existing) = Category::find_custom_by_name(&state.db, user.id, &default.name).await?
    {
        let fields = apply_update(&existing, &payload)?;
        let updated = save_fields(&state, existing.id, fields).await?;
        return Ok(Json(updated.into()));
    }

    // Copy-on-write: materialize the default with the explicit field set
    // applied; unset fields inherit from the default.
    let fields = apply_update(&default, &payload)?;
    let created = Category::create_custom(
        &state.db,
        user.id,
        &fields.name,
        &fields.icon,
        &fields.color,
        fields.budget_monthly,
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            warn!(user_id = %user.id, "concurrent category override");
            ApiError::conflict("Category with this name already exists")
        } else {
            e.into()
        }
    })?;

    Ok(Json(created.into()))
}

async fn save_fields(
    state: &AppState,
    id: Uuid,
    fields: crate::categories::services::CategoryFields,
) -> Result<Category, ApiError> {
    Category::update_custom(
        &state.db,
        id,
        &fields.name,
        &fields.icon,
        &fields.color,
        fields.budget_monthly,
    )
    .await
    .map_err(|e| ApiError::conflict_on_unique(e, "Category with this name already exists"))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(category_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = Category::delete_custom(&state.db, user.id, category_id).await?;
    if !deleted {
        // Defaults and other users' rows both land here on purpose.
        return Err(ApiError::NotFound("Custom category not found"));
    }
    Ok(Json(
        serde_json::json!({ "message": "Category deleted successfully" }),
    ))
}
