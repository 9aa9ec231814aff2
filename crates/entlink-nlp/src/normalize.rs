//! Text normalization for mention keys and token comparison.
//!
//! - [`fold`]: Unicode NFD, combining marks stripped, lowercased. Used to
//!   compare mention tokens with label tokens.
//! - [`normalize_surface`]: trimmed, whitespace collapsed and lowercased
//!   unless matching is case sensitive. Used as the key that merges repeated
//!   mentions of the same surface text.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Case and diacritic fold of a single token.
///
/// ```
/// use entlink_nlp::normalize::fold;
///
/// assert_eq!(fold("Zürich"), "zurich");
/// assert_eq!(fold("GEOLOGIST"), "geologist");
/// ```
pub fn fold(token: &str) -> String {
    token
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalize a surface text into the key used to merge mentions.
pub fn normalize_surface(text: &str, case_sensitive: bool) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if case_sensitive {
        collapsed
    } else {
        collapsed.to_lowercase()
    }
}
