//! Repository for the `memorials` table and its read-side projections.

use sqlx::PgPool;

use memoria_core::memorial::{FEATURED_LIMIT, SEARCH_RESULT_LIMIT};
use memoria_core::search::{contains_pattern, SearchFilters};
use memoria_core::types::DbId;

use crate::models::memorial::{
    CreateMemorial, CreatorSummary, FeaturedMemorial, Memorial, MemorialDetail, OwnedMemorial,
    SearchHit, UpdateMemorial,
};
use crate::repositories::{ImageRepo, TributeRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, created_by, full_name, birth_date, death_date, \
    birth_location, resting_place, relationship, biography, occupation, \
    hobbies, favorite_quote, template, privacy, main_image_url, is_featured, \
    view_count, created_at, updated_at";

/// Resolved main image for a memorial aliased as `m`: the primary image,
/// else the first by display order, else the legacy single-URL field.
const MAIN_IMAGE_EXPR: &str = "COALESCE( \
    (SELECT mi.image_url FROM memorial_images mi \
      WHERE mi.memorial_id = m.id AND mi.is_primary \
      ORDER BY mi.display_order ASC, mi.id ASC LIMIT 1), \
    (SELECT mi.image_url FROM memorial_images mi \
      WHERE mi.memorial_id = m.id \
      ORDER BY mi.display_order ASC, mi.id ASC LIMIT 1), \
    m.main_image_url)";

/// Provides CRUD and query operations for memorials.
pub struct MemorialRepo;

impl MemorialRepo {
    /// Insert a new memorial, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMemorial) -> Result<Memorial, sqlx::Error> {
        let query = format!(
            "INSERT INTO memorials
                (created_by, full_name, birth_date, death_date, birth_location,
                 resting_place, relationship, biography, occupation, hobbies,
                 favorite_quote, template, privacy)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Memorial>(&query)
            .bind(input.created_by)
            .bind(&input.full_name)
            .bind(input.birth_date)
            .bind(input.death_date)
            .bind(&input.birth_location)
            .bind(&input.resting_place)
            .bind(&input.relationship)
            .bind(&input.biography)
            .bind(&input.occupation)
            .bind(&input.hobbies)
            .bind(&input.favorite_quote)
            .bind(&input.template)
            .bind(&input.privacy)
            .fetch_one(pool)
            .await
    }

    /// Find a memorial by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Memorial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM memorials WHERE id = $1");
        sqlx::query_as::<_, Memorial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Assemble the full detail view: memorial, ordered images, approved
    /// tributes (newest first), and creator summary.
    ///
    /// Returns `None` when no memorial with the given id exists.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MemorialDetail>, sqlx::Error> {
        let Some(memorial) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let images = ImageRepo::list_by_memorial(pool, id).await?;
        let tributes = TributeRepo::list_approved(pool, id).await?;
        let creator = sqlx::query_as::<_, CreatorSummary>(
            "SELECT full_name, email, role FROM user_profiles WHERE id = $1",
        )
        .bind(memorial.created_by)
        .fetch_one(pool)
        .await?;

        Ok(Some(MemorialDetail {
            memorial,
            images,
            tributes,
            creator,
        }))
    }

    /// Partially update a memorial. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMemorial,
    ) -> Result<Option<Memorial>, sqlx::Error> {
        let query = format!(
            "UPDATE memorials SET
                full_name = COALESCE($2, full_name),
                birth_date = COALESCE($3, birth_date),
                death_date = COALESCE($4, death_date),
                birth_location = COALESCE($5, birth_location),
                resting_place = COALESCE($6, resting_place),
                relationship = COALESCE($7, relationship),
                biography = COALESCE($8, biography),
                occupation = COALESCE($9, occupation),
                hobbies = COALESCE($10, hobbies),
                favorite_quote = COALESCE($11, favorite_quote),
                template = COALESCE($12, template),
                privacy = COALESCE($13, privacy),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Memorial>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(input.birth_date)
            .bind(input.death_date)
            .bind(&input.birth_location)
            .bind(&input.resting_place)
            .bind(&input.relationship)
            .bind(&input.biography)
            .bind(&input.occupation)
            .bind(&input.hobbies)
            .bind(&input.favorite_quote)
            .bind(input.template.map(|t| t.as_str()))
            .bind(input.privacy.map(|p| p.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Delete a memorial. Images and tributes cascade via referential rules.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM memorials WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all memorials owned by a user, newest first, each annotated
    /// with its tribute count and resolved main image.
    ///
    /// A user with zero memorials gets an empty list, never an error.
    pub async fn list_by_owner(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<OwnedMemorial>, sqlx::Error> {
        let query = format!(
            "SELECT m.*,
                (SELECT COUNT(*) FROM tributes t WHERE t.memorial_id = m.id) AS tribute_count,
                {MAIN_IMAGE_EXPR} AS main_image
             FROM memorials m
             WHERE m.created_by = $1
             ORDER BY m.created_at DESC"
        );
        sqlx::query_as::<_, OwnedMemorial>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Search public memorials.
    ///
    /// A non-empty `query` matches the full name, occupation, or biography
    /// case-insensitively; `filters` narrow by location substring and an
    /// inclusive birth-date range. Results are newest-created-first, capped
    /// at [`SEARCH_RESULT_LIMIT`]. An empty query with no filters is valid
    /// and returns the newest public memorials.
    pub async fn search(
        pool: &PgPool,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        let text_pattern = contains_pattern(query);
        let location_pattern = filters.location.as_deref().and_then(contains_pattern);

        let sql = format!(
            "SELECT m.*, {MAIN_IMAGE_EXPR} AS main_image
             FROM memorials m
             WHERE m.privacy = 'public'
               AND ($1::TEXT IS NULL
                    OR m.full_name ILIKE $1
                    OR m.occupation ILIKE $1
                    OR m.biography ILIKE $1)
               AND ($2::TEXT IS NULL OR m.birth_location ILIKE $2)
               AND ($3::DATE IS NULL OR m.birth_date >= $3)
               AND ($4::DATE IS NULL OR m.birth_date <= $4)
             ORDER BY m.created_at DESC
             LIMIT $5"
        );
        sqlx::query_as::<_, SearchHit>(&sql)
            .bind(text_pattern)
            .bind(location_pattern)
            .bind(filters.birth_after)
            .bind(filters.birth_before)
            .bind(SEARCH_RESULT_LIMIT)
            .fetch_all(pool)
            .await
    }

    /// List public memorials flagged featured, most-visited first, reshaped
    /// for list-card display. Capped at [`FEATURED_LIMIT`].
    pub async fn featured(pool: &PgPool) -> Result<Vec<FeaturedMemorial>, sqlx::Error> {
        let query = format!(
            "SELECT m.id,
                    m.full_name AS name,
                    m.birth_date,
                    m.death_date,
                    {MAIN_IMAGE_EXPR} AS profile_image,
                    m.view_count AS visit_count,
                    (SELECT COUNT(*) FROM memorial_images mi
                      WHERE mi.memorial_id = m.id) AS photo_count
             FROM memorials m
             WHERE m.privacy = 'public' AND m.is_featured
             ORDER BY m.view_count DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, FeaturedMemorial>(&query)
            .bind(FEATURED_LIMIT)
            .fetch_all(pool)
            .await
    }

    /// Atomically increment a memorial's view counter.
    ///
    /// View counting is best-effort: callers log failures and never surface
    /// them to the viewer.
    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE memorials SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
