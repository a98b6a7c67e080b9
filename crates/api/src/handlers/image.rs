//! Handlers for memorial image management.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;

use memoria_core::error::CoreError;
use memoria_core::types::DbId;
use memoria_db::models::image::MemorialImage;
use memoria_db::repositories::ImageRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::memorial::require_owner;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::storage::key_from_url;
use crate::submission::store_image;

/// POST /api/v1/memorials/{id}/images
///
/// Upload one photo to an existing memorial. Multipart parts: `file`
/// (required), `caption` (optional text), `is_primary` (optional, `true`
/// to make this the cover photo).
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(memorial_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<MemorialImage>)> {
    require_owner(&state, memorial_id, &auth).await?;

    let mut bytes: Option<Vec<u8>> = None;
    let mut caption = String::new();
    let mut is_primary = false;
    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => bytes = Some(field.bytes().await?.to_vec()),
            Some("caption") => caption = field.text().await?,
            Some("is_primary") => is_primary = field.text().await? == "true",
            _ => {}
        }
    }
    let bytes = bytes.ok_or_else(|| AppError::BadRequest("Missing 'file' part".into()))?;

    let image = store_image(&state, memorial_id, is_primary, &caption, &bytes).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// DELETE /api/v1/memorials/{id}/images/{image_id}
///
/// Remove a photo. The blob goes first; if blob removal fails the row is
/// kept, so the gallery never shows a broken image.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((memorial_id, image_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_owner(&state, memorial_id, &auth).await?;

    let image = find_in_memorial(&state, memorial_id, image_id).await?;

    if let Some(key) = key_from_url(&image.image_url, &state.config.media_base_url) {
        state.store.remove(&key).await?;
    }
    ImageRepo::delete(&state.pool, image.id).await?;
    tracing::info!(memorial_id, image_id, "Image deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/memorials/{id}/images/{image_id}/primary
///
/// Make this photo the memorial's cover image.
pub async fn set_primary(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((memorial_id, image_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MemorialImage>> {
    require_owner(&state, memorial_id, &auth).await?;

    let image = ImageRepo::set_primary(&state.pool, memorial_id, image_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "image",
            id: image_id,
        }))?;
    Ok(Json(image))
}

/// Look up an image and confirm it belongs to the given memorial.
async fn find_in_memorial(
    state: &AppState,
    memorial_id: DbId,
    image_id: DbId,
) -> AppResult<MemorialImage> {
    let image = ImageRepo::find_by_id(&state.pool, image_id)
        .await?
        .filter(|i| i.memorial_id == memorial_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "image",
            id: image_id,
        }))?;
    Ok(image)
}
