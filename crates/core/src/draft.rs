//! Durable local draft storage and the autosave loop.
//!
//! Drafts live in a single JSON blob under a fixed key: last writer wins,
//! no versioning, no multi-draft support. A stored draft is only restored
//! when its embedded owner id matches the requesting user, so one machine
//! shared by several accounts never leaks an in-progress form.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::error::CoreError;
use crate::form::MemorialForm;
use crate::types::{DbId, Timestamp};

/// Fixed storage key for the in-progress memorial draft.
pub const DRAFT_KEY: &str = "memorial_draft.json";

/// Default autosave interval: two minutes.
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(120);

/// A snapshot of the in-progress form, tagged with its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorialDraft {
    pub form: MemorialForm,
    pub user_id: DbId,
    pub last_saved: Timestamp,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// File-backed key-value store holding at most one draft.
#[derive(Debug, Clone)]
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(DRAFT_KEY)
    }

    /// Overwrite the stored draft with the current form state.
    pub async fn save(&self, form: &MemorialForm, user_id: DbId) -> Result<(), CoreError> {
        let draft = MemorialDraft {
            form: form.clone(),
            user_id,
            last_saved: chrono::Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&draft)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize draft: {e}")))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to create draft dir: {e}")))?;
        tokio::fs::write(self.path(), json)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to write draft: {e}")))?;
        Ok(())
    }

    /// Load the stored draft, if any, for the given user.
    ///
    /// Returns `None` when no draft exists, when the stored draft belongs to
    /// a different user, or when the blob cannot be parsed (a corrupt draft
    /// is logged and treated as absent rather than blocking the form).
    pub async fn load(&self, current_user: DbId) -> Result<Option<MemorialDraft>, CoreError> {
        let bytes = match tokio::fs::read(self.path()).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::Storage(format!("Failed to read draft: {e}"))),
        };

        let draft: MemorialDraft = match serde_json::from_slice(&bytes) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unparseable draft");
                return Ok(None);
            }
        };

        if draft.user_id != current_user {
            return Ok(None);
        }
        Ok(Some(draft))
    }

    /// Remove the stored draft. Clearing an absent draft is not an error.
    pub async fn clear(&self) -> Result<(), CoreError> {
        match tokio::fs::remove_file(self.path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Storage(format!("Failed to clear draft: {e}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Autosave
// ---------------------------------------------------------------------------

/// Fixed-interval background snapshotter for an editing session.
///
/// On every tick the current form state is saved if it has meaningful
/// content (name or biography non-empty) and a user is signed in. Failures
/// are logged and swallowed; autosave never interrupts editing. The task is
/// aborted when the handle is dropped.
pub struct Autosaver {
    task: JoinHandle<()>,
}

impl Autosaver {
    pub fn spawn(
        store: DraftStore,
        form: Arc<RwLock<MemorialForm>>,
        user_id: Option<DbId>,
        every: Duration,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // The first tick completes immediately; consume it so the first
            // save happens one full interval after spawn.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(user_id) = user_id else { continue };
                let snapshot = form.read().await.clone();
                if !snapshot.has_content() {
                    continue;
                }
                if let Err(e) = store.save(&snapshot, user_id).await {
                    tracing::warn!(error = %e, "Autosave failed");
                }
            }
        });
        Self { task }
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        self.task.abort();
    }
}
