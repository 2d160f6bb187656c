//! Geographic unit identifier normalization.
//!
//! Every join in the pipeline is keyed by unit id, so all ids are pushed
//! through [`normalize`] at intake. Tract ids arrive as stringified
//! numeric codes or GEOIDs, sometimes with surrounding whitespace from
//! CSV exports and occasionally with lowercase alpha suffixes.

/// Normalizes a raw unit identifier: trims surrounding whitespace and
/// uppercases any alpha characters.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Returns `true` if the identifier is usable as a join key after
/// normalization (i.e. non-empty).
#[must_use]
pub fn is_valid(raw: &str) -> bool {
    !raw.trim().is_empty()
}
