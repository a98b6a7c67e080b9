//! User profile entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use memoria_core::types::{DbId, Timestamp};

/// A row from the `user_profiles` table.
///
/// The password hash never leaves the server: it is skipped during
/// serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user profile (registration).
#[derive(Debug, Clone)]
pub struct CreateUserProfile {
    pub email: String,
    /// Already hashed; the repository never sees plaintext passwords.
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
}

/// DTO for updating profile fields. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserProfile {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}
