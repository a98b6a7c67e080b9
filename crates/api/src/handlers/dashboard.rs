//! Handlers for the owner dashboard: memorial list, aggregate stats,
//! recent activity.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use memoria_core::memorial::{DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT};
use memoria_core::search::clamp_limit;
use memoria_db::models::dashboard::DashboardStats;
use memoria_db::models::memorial::OwnedMemorial;
use memoria_db::models::tribute::RecentTribute;
use memoria_db::repositories::{DashboardRepo, MemorialRepo, TributeRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /me/dashboard/activity`.
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/me/memorials
///
/// Every memorial the caller owns, newest first, annotated with tribute
/// counts and resolved main images. Zero memorials is an empty list.
pub async fn list_memorials(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<OwnedMemorial>>> {
    let memorials = MemorialRepo::list_by_owner(&state.pool, auth.user_id).await?;
    Ok(Json(memorials))
}

/// GET /api/v1/me/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DashboardStats>> {
    let stats = DashboardRepo::stats(&state.pool, auth.user_id).await?;
    Ok(Json(stats))
}

/// GET /api/v1/me/dashboard/activity
///
/// Recent tributes across all of the caller's memorials, newest first.
/// The limit is clamped to a sane range rather than rejected.
pub async fn activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<Vec<RecentTribute>>> {
    let limit = clamp_limit(query.limit, DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT);
    let tributes = TributeRepo::recent_for_owner(&state.pool, auth.user_id, limit).await?;
    Ok(Json(tributes))
}
