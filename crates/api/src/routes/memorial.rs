//! Route definitions for the `/memorials` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{image, memorial, search, tribute};
use crate::state::AppState;

/// Routes mounted at `/memorials`.
///
/// ```text
/// POST   /                                  -> submit (multipart, auth)
/// POST   /preview                           -> preview (auth)
/// GET    /search                            -> search (public)
/// GET    /featured                          -> featured (public)
/// GET    /{id}                              -> detail (public / owner)
/// PATCH  /{id}                              -> update (owner)
/// DELETE /{id}                              -> delete (owner)
/// POST   /{id}/view                         -> record view (public)
/// POST   /{id}/images                       -> upload (owner)
/// DELETE /{id}/images/{image_id}            -> delete image (owner)
/// PUT    /{id}/images/{image_id}/primary    -> set cover (owner)
/// POST   /{id}/tributes                     -> leave tribute (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(memorial::submit))
        .route("/preview", post(memorial::preview))
        .route("/search", get(search::search))
        .route("/featured", get(search::featured))
        .route(
            "/{id}",
            get(memorial::detail)
                .patch(memorial::update)
                .delete(memorial::delete),
        )
        .route("/{id}/view", post(memorial::record_view))
        .route("/{id}/images", post(image::upload))
        .route("/{id}/images/{image_id}", delete(image::delete))
        .route("/{id}/images/{image_id}/primary", put(image::set_primary))
        .route("/{id}/tributes", post(tribute::create))
}
