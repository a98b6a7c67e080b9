//! Repository for the `password_resets` table.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use memoria_core::types::DbId;

use crate::models::session::PasswordReset;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token_hash, expires_at, used_at, created_at";

/// Provides operations for single-use password-reset tokens.
pub struct PasswordResetRepo;

impl PasswordResetRepo {
    /// Insert a reset token digest valid for `ttl` from now.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<PasswordReset, sqlx::Error> {
        let query = format!(
            "INSERT INTO password_resets (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(user_id)
            .bind(token_hash)
            .bind(Utc::now() + ttl)
            .fetch_one(pool)
            .await
    }

    /// Find an unused, unexpired reset by token digest.
    pub async fn find_valid_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<PasswordReset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM password_resets
             WHERE token_hash = $1
               AND used_at IS NULL
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Consume a reset token. Returns `true` if it was still unused.
    pub async fn mark_used(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE password_resets SET used_at = NOW() WHERE id = $1 AND used_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
