//! Repository for the `recent_searches` table.

use sqlx::PgPool;

use memoria_core::memorial::RECENT_SEARCH_CAP;
use memoria_core::types::DbId;

use crate::models::recent_search::RecentSearch;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, query, searched_at";

/// Provides operations for per-user recent search history.
pub struct RecentSearchRepo;

impl RecentSearchRepo {
    /// Record a search query for a user.
    ///
    /// Repeating an existing query moves it to the front instead of adding
    /// a duplicate, and the list is trimmed to [`RECENT_SEARCH_CAP`] entries
    /// in the same transaction.
    pub async fn record(pool: &PgPool, user_id: DbId, query: &str) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO recent_searches (user_id, query)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_recent_searches_user_query
             DO UPDATE SET searched_at = NOW()",
        )
        .bind(user_id)
        .bind(query)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM recent_searches
             WHERE user_id = $1
               AND id NOT IN (
                 SELECT id FROM recent_searches
                 WHERE user_id = $1
                 ORDER BY searched_at DESC, id DESC
                 LIMIT $2)",
        )
        .bind(user_id)
        .bind(RECENT_SEARCH_CAP)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// List a user's recent searches, most recent first.
    pub async fn list(pool: &PgPool, user_id: DbId) -> Result<Vec<RecentSearch>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recent_searches
             WHERE user_id = $1
             ORDER BY searched_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, RecentSearch>(&query)
            .bind(user_id)
            .bind(RECENT_SEARCH_CAP)
            .fetch_all(pool)
            .await
    }

    /// Drop a user's entire search history.
    pub async fn clear(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recent_searches WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
