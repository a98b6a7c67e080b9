//! Search filter types and query-pattern helpers.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the repository layer and any future CLI tooling.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Optional narrowing filters applied on top of the free-text query.
///
/// All fields are independent; an empty filter set with an empty query is a
/// valid search and returns the newest public memorials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Substring match against the birth location.
    pub location: Option<String>,
    /// Inclusive lower bound on the birth date.
    pub birth_after: Option<NaiveDate>,
    /// Inclusive upper bound on the birth date.
    pub birth_before: Option<NaiveDate>,
}

/// Escape ILIKE metacharacters (`\`, `%`, `_`) in user input.
///
/// Without this, a query like `100%` would match everything.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build a case-insensitive contains pattern from user input.
///
/// Returns `None` for empty or whitespace-only input so callers can skip
/// the predicate entirely.
pub fn contains_pattern(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("%{}%", escape_like(trimmed)))
    }
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}
