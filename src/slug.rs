//! Slug normalization for natural-language primary keys: " TEST name " -> "test-name".

use regex::Regex;
use std::sync::LazyLock;

static NON_ALNUM_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{Alphabetic}\p{Nd}]+").expect("static slug pattern")
});

/// Lowercase `s`, collapse every run of non-alphanumeric characters into a single hyphen,
/// and trim leading/trailing hyphens. Returns an empty string when nothing alphanumeric remains.
pub fn slugify(s: &str) -> String {
    let lower = s.to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Slugify a required key. Missing or all-punctuation input is a malformed request.
pub fn required_slug(field: &'static str, raw: Option<&str>) -> Result<String, crate::error::AppError> {
    let slug = raw.map(slugify).unwrap_or_default();
    if slug.is_empty() {
        return Err(crate::error::AppError::Malformed(format!("{} is required", field)));
    }
    Ok(slug)
}
