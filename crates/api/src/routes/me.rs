//! Route definitions for the `/me` resource (everything scoped to the
//! signed-in user).

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{dashboard, draft, profile, search};
use crate::state::AppState;

/// Routes mounted at `/me`. All require authentication.
///
/// ```text
/// GET    /                    -> profile
/// PATCH  /                    -> update profile
/// PUT    /password            -> change password
/// POST   /avatar              -> upload avatar
/// GET    /memorials           -> owned memorials
/// GET    /dashboard/stats     -> aggregate stats
/// GET    /dashboard/activity  -> recent tributes
/// GET    /draft               -> load draft
/// PUT    /draft               -> save draft
/// DELETE /draft               -> clear draft
/// GET    /searches            -> recent searches
/// DELETE /searches            -> clear recent searches
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::get_me).patch(profile::update_me))
        .route("/password", put(profile::change_password))
        .route("/avatar", post(profile::upload_avatar))
        .route("/memorials", get(dashboard::list_memorials))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/activity", get(dashboard::activity))
        .route(
            "/draft",
            get(draft::get).put(draft::put).delete(draft::delete),
        )
        .route(
            "/searches",
            get(search::recent_searches).delete(search::clear_recent_searches),
        )
}
