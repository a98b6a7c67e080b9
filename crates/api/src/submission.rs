//! The create-memorial submission pipeline.
//!
//! A submission is validated as a whole, the memorial row is created, and
//! the attached photos are then uploaded one at a time. A photo that fails
//! to upload never sinks the submission: the memorial stands and the failure
//! is reported back so the owner can retry from the edit page.

use serde::Serialize;

use memoria_core::error::CoreError;
use memoria_core::form::{validate, MemorialForm};
use memoria_core::types::DbId;
use memoria_db::models::image::{CreateMemorialImage, MemorialImage};
use memoria_db::models::memorial::{CreateMemorial, Memorial};
use memoria_db::repositories::{ImageRepo, MemorialRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::storage::{memorial_image_key, public_url, sniff_extension};

/// One photo that could not be stored during submission.
#[derive(Debug, Serialize)]
pub struct FailedUpload {
    pub file_name: String,
    pub error: String,
}

/// Result of a completed submission.
#[derive(Debug, Serialize)]
pub struct SubmissionOutcome {
    pub memorial: Memorial,
    pub images: Vec<MemorialImage>,
    /// Photos that failed to upload. Empty on a fully clean submission.
    pub failed_uploads: Vec<FailedUpload>,
}

/// Run the full submission pipeline for a validated-on-entry form.
///
/// `files` carries the photo binaries in the same order as `form.images`.
pub async fn submit(
    state: &AppState,
    user_id: DbId,
    form: &MemorialForm,
    files: &[Vec<u8>],
) -> AppResult<SubmissionOutcome> {
    let errors = validate(form);
    if !errors.is_empty() {
        return Err(AppError::Form(errors));
    }
    if files.len() != form.images.len() {
        return Err(AppError::BadRequest(format!(
            "Expected {} file parts to match the declared photos, got {}",
            form.images.len(),
            files.len()
        )));
    }

    let input = CreateMemorial::from_form(form, user_id)?;
    let memorial = MemorialRepo::create(&state.pool, &input).await?;
    tracing::info!(memorial_id = memorial.id, user_id, "Memorial created");

    let mut images = Vec::new();
    let mut failed_uploads = Vec::new();

    for (attachment, bytes) in form.images.iter().zip(files) {
        match store_image(state, memorial.id, attachment.is_primary, &attachment.caption, bytes)
            .await
        {
            Ok(image) => images.push(image),
            Err(e) => {
                tracing::warn!(
                    memorial_id = memorial.id,
                    file_name = %attachment.file_name,
                    error = %e,
                    "Photo upload failed during submission"
                );
                failed_uploads.push(FailedUpload {
                    file_name: attachment.file_name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    // If no explicitly flagged primary survived the uploads, promote the
    // first stored photo so every memorial with images has a cover.
    if !images.is_empty() && !images.iter().any(|i| i.is_primary) {
        if let Some(promoted) =
            ImageRepo::set_primary(&state.pool, memorial.id, images[0].id).await?
        {
            images[0] = promoted;
        }
    }

    // The draft has served its purpose. Clearing is best-effort; a stale
    // draft is merely confusing, not harmful.
    if let Err(e) = state.draft_store(user_id).clear().await {
        tracing::warn!(user_id, error = %e, "Failed to clear draft after submission");
    }

    Ok(SubmissionOutcome {
        memorial,
        images,
        failed_uploads,
    })
}

/// Two-phase image store: blob first, row second.
pub async fn store_image(
    state: &AppState,
    memorial_id: DbId,
    is_primary: bool,
    caption: &str,
    bytes: &[u8],
) -> Result<MemorialImage, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Uploaded file is empty".into(),
        )));
    }
    let ext = sniff_extension(bytes)?;
    let key = memorial_image_key(memorial_id, ext);
    state.store.put(&key, bytes).await?;

    let caption = caption.trim();
    let result = ImageRepo::create(
        &state.pool,
        &CreateMemorialImage {
            memorial_id,
            image_url: public_url(&state.config.media_base_url, &key),
            caption: (!caption.is_empty()).then(|| caption.to_string()),
            is_primary,
        },
    )
    .await;

    match result {
        Ok(image) => Ok(image),
        Err(e) => {
            // The row never landed, so the blob is unreferenced. Best-effort
            // removal keeps storage from accumulating orphans.
            if let Err(cleanup) = state.store.remove(&key).await {
                tracing::warn!(%key, error = %cleanup, "Failed to clean up orphaned blob");
            }
            Err(e.into())
        }
    }
}
