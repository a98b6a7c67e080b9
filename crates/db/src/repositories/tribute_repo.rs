//! Repository for the `tributes` table.

use sqlx::PgPool;

use memoria_core::types::DbId;

use crate::models::tribute::{CreateTribute, RecentTribute, Tribute};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, memorial_id, author_name, author_email, relationship, \
    message, is_approved, created_at";

/// Provides CRUD operations for visitor tributes.
pub struct TributeRepo;

impl TributeRepo {
    /// Insert a new tribute.
    ///
    /// The approval flag comes from the configured moderation mode, not
    /// from visitor input.
    pub async fn create(
        pool: &PgPool,
        memorial_id: DbId,
        input: &CreateTribute,
        approved: bool,
    ) -> Result<Tribute, sqlx::Error> {
        let query = format!(
            "INSERT INTO tributes
                (memorial_id, author_name, author_email, relationship, message, is_approved)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tribute>(&query)
            .bind(memorial_id)
            .bind(&input.author_name)
            .bind(&input.author_email)
            .bind(&input.relationship)
            .bind(&input.message)
            .bind(approved)
            .fetch_one(pool)
            .await
    }

    /// List approved tributes for a memorial, newest first.
    pub async fn list_approved(
        pool: &PgPool,
        memorial_id: DbId,
    ) -> Result<Vec<Tribute>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tributes
             WHERE memorial_id = $1 AND is_approved
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Tribute>(&query)
            .bind(memorial_id)
            .fetch_all(pool)
            .await
    }

    /// Recent approved tributes across all memorials owned by a user,
    /// newest first, joined with each memorial's name for the activity feed.
    pub async fn recent_for_owner(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<RecentTribute>, sqlx::Error> {
        sqlx::query_as::<_, RecentTribute>(
            "SELECT t.id, t.memorial_id, m.full_name AS memorial_name,
                    t.author_name, t.message, t.created_at
             FROM tributes t
             JOIN memorials m ON m.id = t.memorial_id
             WHERE m.created_by = $1 AND t.is_approved
             ORDER BY t.created_at DESC, t.id DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
