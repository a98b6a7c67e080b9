//! Recent search query entity model.

use serde::Serialize;
use sqlx::FromRow;

use memoria_core::types::{DbId, Timestamp};

/// A row from the `recent_searches` table.
///
/// Each user keeps a small rotating list of query strings, deduplicated by
/// exact match and capped by the repository on every insert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentSearch {
    pub id: DbId,
    pub user_id: DbId,
    pub query: String,
    pub searched_at: Timestamp,
}
