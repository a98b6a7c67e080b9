//! Tribute entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use memoria_core::types::{DbId, Timestamp};

/// A row from the `tributes` table.
///
/// Tributes are append-only from the visitor's perspective: no edit or
/// delete surface exists. The author's email is collected but never
/// rendered, so it is skipped during serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tribute {
    pub id: DbId,
    pub memorial_id: DbId,
    pub author_name: String,
    #[serde(skip_serializing)]
    pub author_email: Option<String>,
    pub relationship: Option<String>,
    pub message: String,
    pub is_approved: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a tribute. The memorial id comes from the URL path
/// and the approval flag from the configured moderation mode.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTribute {
    pub author_name: String,
    pub author_email: Option<String>,
    pub relationship: Option<String>,
    pub message: String,
}

/// A tribute joined with its memorial's name for the dashboard
/// recent-activity feed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentTribute {
    pub id: DbId,
    pub memorial_id: DbId,
    pub memorial_name: String,
    pub author_name: String,
    pub message: String,
    pub created_at: Timestamp,
}
