use std::sync::Arc;

use memoria_core::draft::DraftStore;
use memoria_core::types::DbId;

use crate::config::ServerConfig;
use crate::storage::ObjectStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: memoria_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Blob storage backend for uploaded images.
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Draft store scoped to one user's directory.
    ///
    /// Each user gets their own single-slot draft; the store's owner-id gate
    /// on load is kept as a second line of defense.
    pub fn draft_store(&self, user_id: DbId) -> DraftStore {
        DraftStore::new(self.config.draft_dir.join(user_id.to_string()))
    }
}
