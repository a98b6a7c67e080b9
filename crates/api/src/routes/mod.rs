pub mod auth;
pub mod health;
pub mod me;
pub mod memorial;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                            register (public)
/// /auth/login                               login (public)
/// /auth/refresh                             refresh (public)
/// /auth/logout                              logout (requires auth)
/// /auth/forgot-password                     request reset token (public)
/// /auth/reset-password                      consume reset token (public)
///
/// /memorials                                submit (multipart, auth)
/// /memorials/preview                        validate + preview (auth)
/// /memorials/search                         public search
/// /memorials/featured                       featured listing
/// /memorials/{id}                           detail, update, delete
/// /memorials/{id}/view                      record a view (public)
/// /memorials/{id}/images                    upload photo (owner)
/// /memorials/{id}/images/{image_id}         delete photo (owner)
/// /memorials/{id}/images/{image_id}/primary set cover photo (owner)
/// /memorials/{id}/tributes                  leave tribute (public)
///
/// /me                                       profile get/update
/// /me/password                              change password
/// /me/avatar                                upload avatar
/// /me/memorials                             owned memorial list
/// /me/dashboard/stats                       aggregate stats
/// /me/dashboard/activity                    recent tributes
/// /me/draft                                 draft get/put/delete
/// /me/searches                              recent searches get/clear
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/memorials", memorial::router())
        .nest("/me", me::router())
}
