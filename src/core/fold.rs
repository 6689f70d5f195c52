//! Case- and diacritic-insensitive keys
//!
//! List views never sort or search on display text directly. Each sortable
//! field gets a stored projection produced by [`fold`] (`name` → `name_ci`),
//! and both ordering and "starts with" search run against that projection, so
//! one compound index `(field_ci, id)` serves both.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Sorts after every character a folded key can contain.
///
/// Keys are compared bytewise (UTF-8); the maximum scalar value has the
/// largest encoding, so `prefix + HIGH` bounds every key starting with
/// `prefix`.
pub const HIGH: char = char::MAX;

/// Lowercase `text` and strip diacritics / combining marks.
///
/// Surrounding whitespace is removed last, so a stray leading mark cannot
/// leave a leading space behind. The result is meant to be compared by
/// byte order.
pub fn fold(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    folded.trim().to_string()
}

/// Half-open key range `[lower, upper)` matching every key that starts with
/// a folded prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRange {
    pub lower: String,
    pub upper: String,
}

impl PrefixRange {
    /// Range for a raw (unfolded) query; `None` when nothing is left to match
    pub fn for_query(query: &str) -> Option<Self> {
        Self::for_folded(fold(query))
    }

    /// Range for an already-normalized prefix
    pub fn for_folded(prefix: String) -> Option<Self> {
        if prefix.is_empty() {
            return None;
        }
        let mut upper = prefix.clone();
        upper.push(HIGH);
        Some(Self {
            lower: prefix,
            upper,
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        key.as_bytes() >= self.lower.as_bytes() && key.as_bytes() < self.upper.as_bytes()
    }
}
