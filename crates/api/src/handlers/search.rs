//! Handlers for public discovery: search, featured listings, and the
//! signed-in user's recent search history.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use memoria_core::search::SearchFilters;
use memoria_db::models::memorial::{FeaturedMemorial, SearchHit};
use memoria_db::models::recent_search::RecentSearch;
use memoria_db::repositories::{MemorialRepo, RecentSearchRepo};

use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

/// Query parameters for `GET /memorials/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Free-text query matched against name, occupation, and biography.
    #[serde(default)]
    pub q: String,
    pub location: Option<String>,
    pub birth_after: Option<NaiveDate>,
    pub birth_before: Option<NaiveDate>,
}

/// GET /api/v1/memorials/search
///
/// Public search. An empty query with no filters returns the newest public
/// memorials. When the caller is signed in, a non-empty query is recorded
/// in their recent-search history best-effort.
pub async fn search(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<SearchHit>>> {
    let filters = SearchFilters {
        location: query.location.clone(),
        birth_after: query.birth_after,
        birth_before: query.birth_before,
    };
    let hits = MemorialRepo::search(&state.pool, &query.q, &filters).await?;

    let trimmed = query.q.trim();
    if let (Some(user_id), false) = (viewer.user_id(), trimmed.is_empty()) {
        if let Err(e) = RecentSearchRepo::record(&state.pool, user_id, trimmed).await {
            tracing::warn!(user_id, error = %e, "Failed to record recent search");
        }
    }

    Ok(Json(hits))
}

/// GET /api/v1/memorials/featured
///
/// Featured public memorials, most-visited first, shaped for list cards.
pub async fn featured(State(state): State<AppState>) -> AppResult<Json<Vec<FeaturedMemorial>>> {
    let memorials = MemorialRepo::featured(&state.pool).await?;
    Ok(Json(memorials))
}

/// GET /api/v1/me/searches
pub async fn recent_searches(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<RecentSearch>>> {
    let searches = RecentSearchRepo::list(&state.pool, auth.user_id).await?;
    Ok(Json(searches))
}

/// DELETE /api/v1/me/searches
pub async fn clear_recent_searches(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<StatusCode> {
    RecentSearchRepo::clear(&state.pool, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
