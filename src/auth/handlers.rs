use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, PasswordResetConfirm, PasswordResetRequest, PublicUser, RefreshRequest,
            RegisterRequest, ResetRequested, TokenPair,
        },
        repo::User,
        services::{hash_password, is_valid_email, verify_password, JwtKeys},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/password-reset", post(request_password_reset))
        .route("/auth/password-reset/confirm", post(confirm_password_reset))
}

fn check_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::validation("Password too short"));
    }
    if password.len() > 72 {
        return Err(ApiError::validation("Password too long"));
    }
    Ok(())
}

fn public(user: User) -> PublicUser {
    PublicUser {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        is_active: user.is_active,
        created_at: user.created_at,
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }
    check_password(&payload.password)?;

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::conflict("Email already registered"));
    }

    let hash = hash_password(&payload.password)?;
    // The pre-check races with concurrent registrations; losing the race
    // must still read as a duplicate, not a server error.
    let user = User::create(&state.db, &payload.email, payload.full_name.as_deref(), &hash)
        .await
        .map_err(|e| ApiError::conflict_on_unique(e, "Email already registered"))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(public(user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::Unauthorized("Incorrect email or password")
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Incorrect email or password"));
    }

    if !user.is_active {
        warn!(user_id = %user.id, "login on inactive account");
        return Err(ApiError::Forbidden("Inactive user"));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenPair {
        access_token,
        refresh_token,
        token_type: "bearer",
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::Unauthorized("Invalid refresh token"))?;

    // Issue a fresh pair; the old refresh token stays valid until expiry.
    let access_token = keys.sign_access(claims.sub)?;
    let refresh_token = keys.sign_refresh(claims.sub)?;

    Ok(Json(TokenPair {
        access_token,
        refresh_token,
        token_type: "bearer",
    }))
}

#[instrument(skip(state, payload))]
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Json<ResetRequested>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    let user = User::find_by_email(&state.db, &email).await?;

    // Same response whether the account exists or not, to prevent
    // email enumeration.
    let token = match user {
        Some(user) => {
            let keys = JwtKeys::from_ref(&state);
            info!(user_id = %user.id, "password reset requested");
            // TODO: deliver the token by email once a mailer is wired up,
            // instead of returning it in the response body.
            Some(keys.sign_reset(&user.email)?)
        }
        None => None,
    };

    Ok(Json(ResetRequested {
        message: "Password reset email sent",
        token,
    }))
}

#[instrument(skip(state, payload))]
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetConfirm>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let email = keys
        .verify_reset(&payload.token)
        .map_err(|_| ApiError::validation("Invalid or expired reset token"))?;

    check_password(&payload.new_password)?;

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    let hash = hash_password(&payload.new_password)?;
    User::set_password(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password reset");
    Ok(Json(serde_json::json!({ "message": "Password reset successful" })))
}
