//! Handlers for the `/memorials` resource: submission, preview, detail,
//! update, delete.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;

use memoria_core::error::CoreError;
use memoria_core::form::{validate, MemorialForm};
use memoria_core::types::DbId;
use memoria_db::models::memorial::{CreateMemorial, Memorial, MemorialDetail, UpdateMemorial};
use memoria_db::repositories::MemorialRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;
use crate::storage::key_from_url;
use crate::submission::{self, SubmissionOutcome};

/// POST /api/v1/memorials
///
/// Multipart submission of the full create-memorial form: a `form` part
/// carrying the form record as JSON, followed by one `file` part per entry
/// in the form's photo list, in the same order.
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<SubmissionOutcome>)> {
    let mut form: Option<MemorialForm> = None;
    let mut files: Vec<Vec<u8>> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("form") => {
                let text = field.text().await?;
                form = Some(serde_json::from_str(&text).map_err(|e| {
                    AppError::BadRequest(format!("Malformed 'form' part: {e}"))
                })?);
            }
            Some("file") => files.push(field.bytes().await?.to_vec()),
            _ => {}
        }
    }
    let form = form.ok_or_else(|| AppError::BadRequest("Missing 'form' part".into()))?;

    let outcome = submission::submit(&state, auth.user_id, &form, &files).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// POST /api/v1/memorials/preview
///
/// Validate the form and return the memorial exactly as it would be
/// inserted, so the client can render a faithful preview before submitting.
/// No rows are written.
pub async fn preview(
    State(_state): State<AppState>,
    auth: AuthUser,
    Json(form): Json<MemorialForm>,
) -> AppResult<Json<CreateMemorial>> {
    let errors = validate(&form);
    if !errors.is_empty() {
        return Err(AppError::Form(errors));
    }
    Ok(Json(CreateMemorial::from_form(&form, auth.user_id)?))
}

/// GET /api/v1/memorials/{id}
///
/// Full memorial page payload. Non-public memorials are visible only to
/// their owner and answer 404 to everyone else, hiding their existence.
/// View counting is the client's responsibility via `POST /{id}/view`.
pub async fn detail(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MemorialDetail>> {
    let not_found = AppError::Core(CoreError::NotFound {
        entity: "memorial",
        id,
    });

    let detail = MemorialRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(not_found)?;

    if !detail.memorial.is_public() && viewer.user_id() != Some(detail.memorial.created_by) {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "memorial",
            id,
        }));
    }

    Ok(Json(detail))
}

/// POST /api/v1/memorials/{id}/view
///
/// Fire-and-forget visit counter for clients rendering cached pages.
/// Always answers 204; a failed bump is logged, never surfaced.
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if let Err(e) = MemorialRepo::increment_view_count(&state.pool, id).await {
        tracing::warn!(memorial_id = id, error = %e, "Failed to record view");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/memorials/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMemorial>,
) -> AppResult<Json<Memorial>> {
    let current = require_owner(&state, id, &auth).await?;

    if !merged_dates_are_ordered(&current, &input) {
        return Err(AppError::Core(CoreError::Validation(
            "Date of passing must be after birth date".into(),
        )));
    }

    let memorial = MemorialRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "memorial",
            id,
        }))?;
    Ok(Json(memorial))
}

/// DELETE /api/v1/memorials/{id}
///
/// Remove the memorial. Image and tribute rows cascade with it; the image
/// blobs are cleaned up afterwards best-effort, since a leaked blob is
/// recoverable while a half-deleted memorial is not.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_owner(&state, id, &auth).await?;

    let images = memoria_db::repositories::ImageRepo::list_by_memorial(&state.pool, id).await?;
    if !MemorialRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "memorial",
            id,
        }));
    }
    tracing::info!(memorial_id = id, user_id = auth.user_id, "Memorial deleted");

    for image in &images {
        let Some(key) = key_from_url(&image.image_url, &state.config.media_base_url) else {
            continue;
        };
        if let Err(e) = state.store.remove(&key).await {
            tracing::warn!(memorial_id = id, key = %key, error = %e,
                "Failed to remove blob for deleted memorial");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// A patch may move either date on its own, so the invariant is checked
/// over the merged record, not just the fields present in the patch.
fn merged_dates_are_ordered(current: &Memorial, input: &UpdateMemorial) -> bool {
    let birth = input.birth_date.unwrap_or(current.birth_date);
    let death = input.death_date.unwrap_or(current.death_date);
    birth < death
}

/// Load the memorial and confirm the caller owns it.
///
/// Answers 404 for a missing id and 403 for someone else's memorial.
pub(crate) async fn require_owner(
    state: &AppState,
    id: DbId,
    auth: &AuthUser,
) -> AppResult<Memorial> {
    let memorial = MemorialRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "memorial",
            id,
        }))?;
    if memorial.created_by != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the memorial's creator may modify it".into(),
        )));
    }
    Ok(memorial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stored_memorial() -> Memorial {
        Memorial {
            id: 1,
            created_by: 7,
            full_name: "Ada Example".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1940, 3, 14).unwrap(),
            death_date: NaiveDate::from_ymd_opt(2020, 11, 2).unwrap(),
            birth_location: String::new(),
            resting_place: String::new(),
            relationship: String::new(),
            biography: "A long life.".to_string(),
            occupation: String::new(),
            hobbies: String::new(),
            favorite_quote: String::new(),
            template: "classic".to_string(),
            privacy: "public".to_string(),
            main_image_url: None,
            is_featured: false,
            view_count: 0,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn patching_only_the_death_date_is_checked_against_the_stored_birth() {
        let current = stored_memorial();
        let patch = UpdateMemorial {
            death_date: NaiveDate::from_ymd_opt(1930, 1, 1),
            ..Default::default()
        };
        assert!(!merged_dates_are_ordered(&current, &patch));
    }

    #[test]
    fn patching_only_the_birth_date_is_checked_against_the_stored_death() {
        let current = stored_memorial();
        let patch = UpdateMemorial {
            birth_date: NaiveDate::from_ymd_opt(2021, 1, 1),
            ..Default::default()
        };
        assert!(!merged_dates_are_ordered(&current, &patch));
    }

    #[test]
    fn valid_single_date_patches_pass() {
        let current = stored_memorial();
        let patch = UpdateMemorial {
            death_date: NaiveDate::from_ymd_opt(2019, 6, 1),
            ..Default::default()
        };
        assert!(merged_dates_are_ordered(&current, &patch));

        let patch = UpdateMemorial {
            birth_date: NaiveDate::from_ymd_opt(1950, 6, 1),
            ..Default::default()
        };
        assert!(merged_dates_are_ordered(&current, &patch));
    }

    #[test]
    fn patches_without_dates_always_pass() {
        let current = stored_memorial();
        assert!(merged_dates_are_ordered(&current, &UpdateMemorial::default()));
    }

    #[test]
    fn both_dates_in_the_patch_are_checked_against_each_other() {
        let current = stored_memorial();
        let patch = UpdateMemorial {
            birth_date: NaiveDate::from_ymd_opt(2000, 1, 1),
            death_date: NaiveDate::from_ymd_opt(1999, 1, 1),
            ..Default::default()
        };
        assert!(!merged_dates_are_ordered(&current, &patch));
    }
}
