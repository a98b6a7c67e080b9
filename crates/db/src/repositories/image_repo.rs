//! Repository for the `memorial_images` table.

use sqlx::PgPool;

use memoria_core::types::DbId;

use crate::models::image::{CreateMemorialImage, MemorialImage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, memorial_id, image_url, caption, display_order, is_primary, created_at";

/// Provides CRUD operations for memorial images.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert a new image row at the end of the display sequence.
    ///
    /// When `is_primary` is set, the flag is cleared on all siblings in the
    /// same transaction so at most one image per memorial is primary.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMemorialImage,
    ) -> Result<MemorialImage, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if input.is_primary {
            sqlx::query("UPDATE memorial_images SET is_primary = FALSE WHERE memorial_id = $1")
                .bind(input.memorial_id)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "INSERT INTO memorial_images (memorial_id, image_url, caption, display_order, is_primary)
             SELECT $1, $2, $3,
                    COALESCE(MAX(display_order) + 1, 0),
                    $4
             FROM memorial_images WHERE memorial_id = $1
             RETURNING {COLUMNS}"
        );
        let image = sqlx::query_as::<_, MemorialImage>(&query)
            .bind(input.memorial_id)
            .bind(&input.image_url)
            .bind(&input.caption)
            .bind(input.is_primary)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(image)
    }

    /// Find an image by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MemorialImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM memorial_images WHERE id = $1");
        sqlx::query_as::<_, MemorialImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all images for a memorial in display order.
    pub async fn list_by_memorial(
        pool: &PgPool,
        memorial_id: DbId,
    ) -> Result<Vec<MemorialImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM memorial_images
             WHERE memorial_id = $1
             ORDER BY display_order ASC, id ASC"
        );
        sqlx::query_as::<_, MemorialImage>(&query)
            .bind(memorial_id)
            .fetch_all(pool)
            .await
    }

    /// Whether any image of the memorial is flagged primary.
    pub async fn has_primary(pool: &PgPool, memorial_id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM memorial_images WHERE memorial_id = $1 AND is_primary)",
        )
        .bind(memorial_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Flag one image as primary, clearing the flag on every sibling in the
    /// same transaction. Exactly one image is primary afterwards.
    ///
    /// Returns `None` if the image does not exist under the given memorial.
    pub async fn set_primary(
        pool: &PgPool,
        memorial_id: DbId,
        image_id: DbId,
    ) -> Result<Option<MemorialImage>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE memorial_images SET is_primary = FALSE WHERE memorial_id = $1")
            .bind(memorial_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE memorial_images SET is_primary = TRUE
             WHERE id = $1 AND memorial_id = $2
             RETURNING {COLUMNS}"
        );
        let image = sqlx::query_as::<_, MemorialImage>(&query)
            .bind(image_id)
            .bind(memorial_id)
            .fetch_optional(&mut *tx)
            .await?;

        // Roll back the sibling clear if the target image was absent.
        if image.is_some() {
            tx.commit().await?;
        } else {
            tx.rollback().await?;
        }
        Ok(image)
    }

    /// Delete an image row. Returns `true` if a row was removed.
    ///
    /// Blob removal is the caller's responsibility and must happen first;
    /// see the storage layer's two-phase delete.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM memorial_images WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
