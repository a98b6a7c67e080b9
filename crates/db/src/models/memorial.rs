//! Memorial entity model, DTOs, and read-side projections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use memoria_core::error::CoreError;
use memoria_core::form::MemorialForm;
use memoria_core::memorial::{Privacy, Template};
use memoria_core::types::{DbId, Timestamp};

use crate::models::image::MemorialImage;
use crate::models::tribute::Tribute;

/// A row from the `memorials` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Memorial {
    pub id: DbId,
    pub created_by: DbId,
    // -- Subject identity --
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub death_date: NaiveDate,
    pub birth_location: String,
    pub resting_place: String,
    pub relationship: String,
    // -- Narrative --
    pub biography: String,
    pub occupation: String,
    pub hobbies: String,
    pub favorite_quote: String,
    // -- Presentation --
    pub template: String,
    pub privacy: String,
    /// Legacy single-URL field, kept as a main-image fallback.
    pub main_image_url: Option<String>,
    // -- Derived counters --
    pub is_featured: bool,
    pub view_count: i64,
    // -- Timestamps --
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Memorial {
    /// Whether this memorial is visible to anonymous visitors.
    pub fn is_public(&self) -> bool {
        self.privacy == Privacy::Public.as_str()
    }
}

/// DTO for inserting a new memorial. Also serves as the preview payload,
/// which is why it is serializable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemorial {
    pub created_by: DbId,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub death_date: NaiveDate,
    pub birth_location: String,
    pub resting_place: String,
    pub relationship: String,
    pub biography: String,
    pub occupation: String,
    pub hobbies: String,
    pub favorite_quote: String,
    pub template: String,
    pub privacy: String,
}

impl CreateMemorial {
    /// Map a validated form record to insert field names.
    ///
    /// Callers must have run form validation first; missing dates or
    /// selections here indicate a programming error upstream and are
    /// reported as such rather than panicking.
    pub fn from_form(form: &MemorialForm, created_by: DbId) -> Result<Self, CoreError> {
        let birth_date = form
            .birth_date
            .ok_or_else(|| CoreError::Internal("Unvalidated form: missing birth date".into()))?;
        let death_date = form
            .death_date
            .ok_or_else(|| CoreError::Internal("Unvalidated form: missing death date".into()))?;
        let template = form
            .template
            .ok_or_else(|| CoreError::Internal("Unvalidated form: missing template".into()))?;
        let privacy = form
            .privacy
            .ok_or_else(|| CoreError::Internal("Unvalidated form: missing privacy".into()))?;

        Ok(Self {
            created_by,
            full_name: form.full_name.trim().to_string(),
            birth_date,
            death_date,
            birth_location: form.birth_location.trim().to_string(),
            resting_place: form.resting_place.trim().to_string(),
            relationship: form.relationship.trim().to_string(),
            biography: form.biography.trim().to_string(),
            occupation: form.occupation.trim().to_string(),
            hobbies: form.hobbies.trim().to_string(),
            favorite_quote: form.favorite_quote.trim().to_string(),
            template: template.as_str().to_string(),
            privacy: privacy.as_str().to_string(),
        })
    }
}

/// DTO for partially updating a memorial. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMemorial {
    pub full_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub birth_location: Option<String>,
    pub resting_place: Option<String>,
    pub relationship: Option<String>,
    pub biography: Option<String>,
    pub occupation: Option<String>,
    pub hobbies: Option<String>,
    pub favorite_quote: Option<String>,
    pub template: Option<Template>,
    pub privacy: Option<Privacy>,
}

/// Denormalized creator summary embedded in a memorial detail view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreatorSummary {
    pub full_name: String,
    pub email: String,
    pub role: String,
}

/// Full detail view: the memorial plus its ordered images, approved
/// tributes (newest first), and creator summary.
#[derive(Debug, Clone, Serialize)]
pub struct MemorialDetail {
    #[serde(flatten)]
    pub memorial: Memorial,
    pub images: Vec<MemorialImage>,
    pub tributes: Vec<Tribute>,
    pub creator: CreatorSummary,
}

/// A memorial owned by a user, annotated with computed fields for the
/// dashboard list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OwnedMemorial {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub memorial: Memorial,
    /// Count of all tributes on this memorial (approved or not).
    pub tribute_count: i64,
    /// Primary image, else first by display order, else the legacy URL.
    pub main_image: Option<String>,
}

/// A public search result: the memorial plus its resolved main image.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchHit {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub memorial: Memorial,
    pub main_image: Option<String>,
}

/// A featured memorial reshaped for list-card display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeaturedMemorial {
    pub id: DbId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub death_date: NaiveDate,
    pub profile_image: Option<String>,
    pub visit_count: i64,
    pub photo_count: i64,
}
