//! Memorial domain enums and service-wide limits.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum number of rows returned by a public search.
pub const SEARCH_RESULT_LIMIT: i64 = 50;

/// Maximum number of featured memorials on discovery surfaces.
pub const FEATURED_LIMIT: i64 = 6;

/// Minimum biography length (characters, after trimming).
pub const MIN_BIOGRAPHY_CHARS: usize = 50;

/// Default number of recent-activity entries on the dashboard.
pub const DEFAULT_ACTIVITY_LIMIT: i64 = 10;

/// Maximum number of recent-activity entries per request.
pub const MAX_ACTIVITY_LIMIT: i64 = 50;

/// Recent search queries kept per user, most-recent-first.
pub const RECENT_SEARCH_CAP: i64 = 5;

// ---------------------------------------------------------------------------
// Privacy
// ---------------------------------------------------------------------------

/// Visibility level of a memorial page.
///
/// Only `public` memorials appear in search and featured listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    /// Anyone can view and leave tributes.
    Public,
    /// Visible to invited family members and close friends.
    Family,
    /// Only the owner can view.
    Private,
}

impl Privacy {
    /// Database / wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Family => "family",
            Self::Private => "private",
        }
    }

    /// Parse from the database `privacy` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "public" => Ok(Self::Public),
            "family" => Ok(Self::Family),
            "private" => Ok(Self::Private),
            other => Err(CoreError::Validation(format!(
                "Unknown privacy level '{other}'. Must be one of: public, family, private"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// Presentation template applied to a memorial page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Classic,
    Modern,
    Garden,
    Spiritual,
    Military,
    Celebration,
}

impl Template {
    /// Database / wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Modern => "modern",
            Self::Garden => "garden",
            Self::Spiritual => "spiritual",
            Self::Military => "military",
            Self::Celebration => "celebration",
        }
    }

    /// Parse from the database `template` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "classic" => Ok(Self::Classic),
            "modern" => Ok(Self::Modern),
            "garden" => Ok(Self::Garden),
            "spiritual" => Ok(Self::Spiritual),
            "military" => Ok(Self::Military),
            "celebration" => Ok(Self::Celebration),
            other => Err(CoreError::Validation(format!(
                "Unknown template '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tribute moderation
// ---------------------------------------------------------------------------

/// How visitor tributes enter the approval pipeline.
///
/// The original behavior (every tribute immediately visible) is kept as the
/// default, but moderation is a deliberate configuration choice rather than a
/// hard-coded constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModerationMode {
    /// New tributes are visible immediately.
    #[default]
    AutoApprove,
    /// New tributes are hidden until the owner approves them.
    PendingReview,
}

impl ModerationMode {
    /// Whether a freshly created tribute should be flagged approved.
    pub fn auto_approves(self) -> bool {
        matches!(self, Self::AutoApprove)
    }

    /// Parse from a configuration string (`auto_approve` / `pending_review`).
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "auto_approve" => Ok(Self::AutoApprove),
            "pending_review" => Ok(Self::PendingReview),
            other => Err(CoreError::Validation(format!(
                "Unknown moderation mode '{other}'. Must be one of: auto_approve, pending_review"
            ))),
        }
    }
}
