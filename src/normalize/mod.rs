//! Shared normalization rules for identifiers and names.
//!
//! Every equality test in the engine (outcome resolution and admin autofill)
//! goes through these functions so the two call sites can never drift apart.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize an internal id for comparison: trimmed and lower-cased.
pub fn normalize_id(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Normalize an external provider id/slug. Same rule as internal ids today,
/// kept separate so the two schemes can diverge without touching call sites.
pub fn normalize_provider_id(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Strip diacritics: NFD decomposition, then drop the combining marks.
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalize a human name for comparison: diacritics stripped, lower-cased,
/// non-alphanumeric runs collapsed to single spaces.
pub fn normalize_name(s: &str) -> String {
    strip_diacritics(s)
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comparison key for a first/last name pair: alphanumeric-only, lower-cased,
/// diacritics stripped. Empty when both parts are absent, and an empty key
/// must never be treated as matching another empty key.
pub fn name_key(first: Option<&str>, last: Option<&str>) -> String {
    let mut key = String::new();
    for part in [first, last].into_iter().flatten() {
        key.extend(
            strip_diacritics(part)
                .to_lowercase()
                .chars()
                .filter(|c| c.is_alphanumeric()),
        );
    }
    key
}

/// Whether a string is a canonical hyphenated UUID (8-4-4-4-12). Only the
/// hyphenated form counts; provider slugs that merely contain hyphens do not.
pub fn is_uuid_shaped(s: &str) -> bool {
    s.len() == 36 && uuid::Uuid::try_parse(s).is_ok()
}

/// Turn a provider slug into a readable name: split on hyphens, drop a
/// trailing single-letter position token (a lone "g"/"f"/"c") and a trailing
/// purely-numeric jersey/disambiguator token, then title-case the rest.
pub fn unslug(slug: &str) -> String {
    let mut segments: Vec<&str> = slug.trim().split('-').filter(|s| !s.is_empty()).collect();
    while segments.len() > 1 {
        let last = segments[segments.len() - 1];
        let is_position = last.len() == 1 && last.chars().all(|c| c.is_ascii_alphabetic());
        let is_number = !last.is_empty() && last.chars().all(|c| c.is_ascii_digit());
        if is_position || is_number {
            segments.pop();
        } else {
            break;
        }
    }
    segments
        .iter()
        .map(|s| title_case(s))
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
