//! Handlers for the single-slot create-memorial draft.
//!
//! Each user has at most one draft; saving overwrites, loading restores it
//! only for its owner, and clearing is idempotent. The client drives the
//! two-minute autosave cadence by calling PUT on its own timer; the server
//! simply persists whatever arrives.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use memoria_core::draft::MemorialDraft;
use memoria_core::form::MemorialForm;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/me/draft
///
/// The stored draft, or `null` when none exists (including when the stored
/// blob is corrupt; a broken draft never blocks starting fresh).
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Option<MemorialDraft>>> {
    let draft = state.draft_store(auth.user_id).load(auth.user_id).await?;
    Ok(Json(draft))
}

/// PUT /api/v1/me/draft
///
/// Overwrite the draft with the current form state. Last writer wins.
pub async fn put(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(form): Json<MemorialForm>,
) -> AppResult<StatusCode> {
    state
        .draft_store(auth.user_id)
        .save(&form, auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/me/draft
pub async fn delete(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    state.draft_store(auth.user_id).clear().await?;
    Ok(StatusCode::NO_CONTENT)
}
