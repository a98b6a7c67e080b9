//! Handler for visitor tributes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use memoria_core::error::CoreError;
use memoria_core::types::DbId;
use memoria_db::models::tribute::{CreateTribute, Tribute};
use memoria_db::repositories::{MemorialRepo, TributeRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::map_validation_errors;
use crate::middleware::auth::MaybeAuthUser;
use crate::state::AppState;

/// Request body for `POST /memorials/{id}/tributes`.
///
/// Only the author's name and the message are required; email and
/// relationship are validated when present.
#[derive(Debug, Deserialize, Validate)]
pub struct TributeRequest {
    #[validate(length(min = 1, max = 100, message = "is required"))]
    pub author_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub author_email: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub relationship: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "is required"))]
    pub message: String,
}

/// POST /api/v1/memorials/{id}/tributes
///
/// Leave a tribute. No account is needed; visitors identify themselves in
/// the request body. Whether the tribute appears immediately depends on the
/// configured moderation mode. Non-public memorials accept tributes only
/// from their owner.
pub async fn create(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(memorial_id): Path<DbId>,
    Json(input): Json<TributeRequest>,
) -> AppResult<(StatusCode, Json<Tribute>)> {
    input.validate().map_err(map_validation_errors)?;

    let memorial = MemorialRepo::find_by_id(&state.pool, memorial_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "memorial",
            id: memorial_id,
        }))?;
    if !memorial.is_public() && viewer.user_id() != Some(memorial.created_by) {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "memorial",
            id: memorial_id,
        }));
    }

    let tribute = TributeRepo::create(
        &state.pool,
        memorial_id,
        &CreateTribute {
            author_name: input.author_name.trim().to_string(),
            author_email: input.author_email.as_deref().map(|e| e.trim().to_string()),
            relationship: input.relationship.as_deref().map(|r| r.trim().to_string()),
            message: input.message.trim().to_string(),
        },
        state.config.moderation.auto_approves(),
    )
    .await?;
    tracing::info!(memorial_id, tribute_id = tribute.id, "Tribute left");

    Ok((StatusCode::CREATED, Json(tribute)))
}
