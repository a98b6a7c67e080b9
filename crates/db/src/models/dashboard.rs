//! Dashboard aggregate projections.

use serde::Serialize;
use sqlx::FromRow;

/// Aggregate statistics over all memorials owned by one user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DashboardStats {
    pub memorial_count: i64,
    pub total_views: i64,
    pub tribute_count: i64,
}
