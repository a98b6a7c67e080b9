//! Memorial image entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use memoria_core::types::{DbId, Timestamp};

/// A row from the `memorial_images` table.
///
/// At most one image per memorial carries `is_primary = true`; the
/// repository enforces this by clearing siblings inside the same
/// transaction whenever a primary is set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemorialImage {
    pub id: DbId,
    pub memorial_id: DbId,
    pub image_url: String,
    pub caption: Option<String>,
    /// Rendering sequence, ascending.
    pub display_order: i32,
    pub is_primary: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a new image row after a successful blob upload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMemorialImage {
    pub memorial_id: DbId,
    pub image_url: String,
    pub caption: Option<String>,
    pub is_primary: bool,
}
