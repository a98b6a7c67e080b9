//! HTTP handlers, one module per resource.

pub mod auth;
pub mod dashboard;
pub mod draft;
pub mod image;
pub mod memorial;
pub mod profile;
pub mod search;
pub mod tribute;

use memoria_core::error::CoreError;

use crate::error::AppError;

/// Flatten `validator` derive output into a single human-readable message.
pub(crate) fn map_validation_errors(errors: validator::ValidationErrors) -> AppError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: invalid value"),
            })
        })
        .collect();
    parts.sort();
    AppError::Core(CoreError::Validation(parts.join("; ")))
}
