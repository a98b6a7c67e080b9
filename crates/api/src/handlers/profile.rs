//! Handlers for the `/me` profile resource.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use memoria_core::error::CoreError;
use memoria_db::models::user::{UpdateUserProfile, UserProfile};
use memoria_db::repositories::{SessionRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::storage::{avatar_key, key_from_url, public_url, sniff_extension};

/// Request body for `PUT /me/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// GET /api/v1/me
pub async fn get_me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserProfile>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth.user_id,
        }))?;
    Ok(Json(user))
}

/// PATCH /api/v1/me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateUserProfile>,
) -> AppResult<Json<UserProfile>> {
    if let Some(name) = &input.full_name {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Full name must not be empty".into(),
            )));
        }
    }
    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth.user_id,
        }))?;
    Ok(Json(user))
}

/// PUT /api/v1/me/password
///
/// Change the password after re-verifying the current one. Other sessions
/// are revoked; the caller keeps their access token until it expires.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth.user_id,
        }))?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password_hash(&state.pool, auth.user_id, &password_hash).await?;
    SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/me/avatar
///
/// Upload a new avatar image (multipart `file` part). The new blob is
/// stored before the profile row is switched over; the old blob is then
/// removed best-effort.
pub async fn upload_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<UserProfile>> {
    let mut bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            bytes = Some(field.bytes().await?.to_vec());
        }
    }
    let bytes = bytes
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'file' part".into()))?;

    let ext = sniff_extension(&bytes)?;
    let key = avatar_key(auth.user_id, ext);
    state.store.put(&key, &bytes).await?;

    let url = public_url(&state.config.media_base_url, &key);
    let previous = UserRepo::set_avatar_url(&state.pool, auth.user_id, &url).await?;

    if let Some(old_key) =
        previous.and_then(|old| key_from_url(&old, &state.config.media_base_url))
    {
        if let Err(e) = state.store.remove(&old_key).await {
            tracing::warn!(user_id = auth.user_id, key = %old_key, error = %e,
                "Failed to remove replaced avatar blob");
        }
    }

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth.user_id,
        }))?;
    Ok(Json(user))
}
