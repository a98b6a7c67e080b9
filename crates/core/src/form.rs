//! The create-memorial form record and its validation rules.
//!
//! Validation produces a field → message map. Every rule is evaluated
//! independently (no short-circuiting) so the client can surface all
//! problems in one pass; submission proceeds only when the map is empty.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::memorial::{Privacy, Template, MIN_BIOGRAPHY_CHARS};

// ---------------------------------------------------------------------------
// Form record
// ---------------------------------------------------------------------------

/// Notification preferences chosen in the privacy section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPrefs {
    pub tributes: bool,
    pub anniversaries: bool,
    pub photo_uploads: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            tributes: true,
            anniversaries: true,
            photo_uploads: false,
        }
    }
}

/// Metadata for one photo attached to the form.
///
/// The binary itself travels out-of-band (multipart file parts, matched to
/// these entries by position).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageAttachment {
    pub file_name: String,
    pub caption: String,
    /// Explicit primary choice. When no attachment is flagged, the first
    /// successfully uploaded image becomes primary.
    pub is_primary: bool,
}

/// The in-progress memorial form, collected across five sections
/// (identity, biography, photos, template, privacy).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorialForm {
    // -- Identity --
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub birth_location: String,
    pub resting_place: String,
    pub relationship: String,

    // -- Biography --
    pub biography: String,
    pub occupation: String,
    pub hobbies: String,
    pub favorite_quote: String,

    // -- Photos --
    pub images: Vec<ImageAttachment>,

    // -- Presentation --
    pub template: Option<Template>,
    pub privacy: Option<Privacy>,
    pub notifications: NotificationPrefs,
}

impl MemorialForm {
    /// Whether the form carries anything worth autosaving.
    pub fn has_content(&self) -> bool {
        !self.full_name.trim().is_empty() || !self.biography.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Field → human-readable message map produced by [`validate`].
///
/// Keys are the form field names; iteration order is stable (BTreeMap) so
/// error rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }
}

/// Validate a memorial form, evaluating every rule.
///
/// An empty result means the form may be submitted or previewed.
pub fn validate(form: &MemorialForm) -> FormErrors {
    let mut errors = FormErrors::default();

    if form.full_name.trim().is_empty() {
        errors.insert("full_name", "Full name is required");
    }
    if form.birth_date.is_none() {
        errors.insert("birth_date", "Birth date is required");
    }
    if form.death_date.is_none() {
        errors.insert("death_date", "Date of passing is required");
    }
    if let (Some(birth), Some(death)) = (form.birth_date, form.death_date) {
        if birth >= death {
            errors.insert("death_date", "Date of passing must be after birth date");
        }
    }
    if form.relationship.trim().is_empty() {
        errors.insert("relationship", "Please specify your relationship");
    }

    let biography = form.biography.trim();
    if biography.is_empty() {
        errors.insert(
            "biography",
            "Biography is required to create a meaningful memorial",
        );
    } else if biography.chars().count() < MIN_BIOGRAPHY_CHARS {
        errors.insert(
            "biography",
            format!(
                "Please provide a more detailed biography (at least {MIN_BIOGRAPHY_CHARS} characters)"
            ),
        );
    }

    if form.images.is_empty() {
        errors.insert("images", "Please upload at least one photo");
    }
    if form.template.is_none() {
        errors.insert("template", "Please select a memorial template");
    }
    if form.privacy.is_none() {
        errors.insert("privacy", "Please select privacy settings");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A form that passes every rule.
    fn valid_form() -> MemorialForm {
        MemorialForm {
            full_name: "Eleanor Ruth Hastings".into(),
            birth_date: Some(date(1932, 4, 12)),
            death_date: Some(date(2024, 1, 3)),
            birth_location: "Portland, Oregon".into(),
            resting_place: "Riverview Cemetery".into(),
            relationship: "grandchild".into(),
            biography: "Eleanor taught primary school for forty years and never \
                        once missed the first day of term."
                .into(),
            occupation: "Teacher".into(),
            hobbies: "Gardening, crosswords".into(),
            favorite_quote: String::new(),
            images: vec![ImageAttachment {
                file_name: "eleanor.jpg".into(),
                caption: "Summer 1987".into(),
                is_primary: false,
            }],
            template: Some(Template::Classic),
            privacy: Some(Privacy::Public),
            notifications: NotificationPrefs::default(),
        }
    }

    #[test]
    fn valid_form_produces_empty_map() {
        let errors = validate(&valid_form());
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn empty_form_flags_every_required_field() {
        let errors = validate(&MemorialForm::default());
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                "biography",
                "birth_date",
                "death_date",
                "full_name",
                "images",
                "privacy",
                "relationship",
                "template",
            ]
        );
    }

    #[test]
    fn missing_fields_map_exactly_to_their_keys() {
        let mut form = valid_form();
        form.full_name = "   ".into();
        form.relationship.clear();
        let errors = validate(&form);
        assert_eq!(errors.len(), 2);
        assert!(errors.get("full_name").is_some());
        assert!(errors.get("relationship").is_some());
    }

    #[test]
    fn birth_on_or_after_death_yields_death_date_error() {
        let mut form = valid_form();
        form.birth_date = Some(date(2024, 1, 3));
        form.death_date = Some(date(2024, 1, 3));
        let errors = validate(&form);
        assert_eq!(
            errors.get("death_date"),
            Some("Date of passing must be after birth date")
        );

        // Also when every other field is invalid.
        let mut bare = MemorialForm::default();
        bare.birth_date = Some(date(2000, 6, 1));
        bare.death_date = Some(date(1990, 6, 1));
        assert!(validate(&bare).get("death_date").is_some());
    }

    #[test]
    fn biography_boundary_at_fifty_characters() {
        let mut form = valid_form();

        form.biography = "x".repeat(49);
        assert!(validate(&form).get("biography").is_some());

        form.biography = "x".repeat(50);
        assert!(validate(&form).get("biography").is_none());

        // Trailing whitespace does not count toward the minimum.
        form.biography = format!("{}   ", "x".repeat(49));
        assert!(validate(&form).get("biography").is_some());
    }

    #[test]
    fn at_least_one_image_required() {
        let mut form = valid_form();
        form.images.clear();
        assert_eq!(
            validate(&form).get("images"),
            Some("Please upload at least one photo")
        );
    }

    #[test]
    fn has_content_requires_name_or_biography() {
        let mut form = MemorialForm::default();
        assert!(!form.has_content());
        form.full_name = "  ".into();
        assert!(!form.has_content());
        form.biography = "Remembering".into();
        assert!(form.has_content());
    }
}
