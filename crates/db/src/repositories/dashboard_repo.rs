//! Repository for dashboard aggregate queries.

use sqlx::PgPool;

use memoria_core::types::DbId;

use crate::models::dashboard::DashboardStats;

/// Provides read-only aggregate queries scoped to one owner.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Count memorials, sum view counts, and count tributes across all
    /// memorials owned by `user_id`. Zero rows yield zero counts.
    pub async fn stats(pool: &PgPool, user_id: DbId) -> Result<DashboardStats, sqlx::Error> {
        sqlx::query_as::<_, DashboardStats>(
            "SELECT
                (SELECT COUNT(*) FROM memorials WHERE created_by = $1) AS memorial_count,
                (SELECT COALESCE(SUM(view_count), 0) FROM memorials
                  WHERE created_by = $1)::BIGINT AS total_views,
                (SELECT COUNT(*) FROM tributes t
                  JOIN memorials m ON m.id = t.memorial_id
                  WHERE m.created_by = $1) AS tribute_count",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
