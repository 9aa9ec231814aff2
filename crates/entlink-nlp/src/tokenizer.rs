//! Label tokenizers.
//!
//! The same [`LabelTokenizer`] is applied to mention texts and to entity
//! labels returned by a searcher, so that match scoring compares like with
//! like. Implementations must be pure: the same input always yields the
//! same tokens.
//!
//! # Implementations
//!
//! - [`SimpleTokenizer`]: splits on whitespace and punctuation
//! - [`UnicodeWordTokenizer`]: UAX #29 word boundaries
//! - [`LanguageTokenizer`]: per-language dispatch with a fallback

use std::collections::HashMap;
use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

/// Splits a label into comparable tokens.
pub trait LabelTokenizer: Send + Sync {
    /// Tokenize `label`. `language` is a BCP 47 tag such as `"en"` or `"de-AT"`.
    fn tokenize(&self, label: &str, language: Option<&str>) -> Vec<String>;

    /// Name of this tokenizer (for diagnostics).
    fn name(&self) -> &str;
}

/// A shared tokenizer that can be used across threads.
pub type SharedTokenizer = Arc<dyn LabelTokenizer>;

/// Whitespace/punctuation splitter, the language independent fallback.
///
/// Tokens are maximal runs of alphanumeric characters; everything else
/// separates tokens and is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTokenizer;

impl LabelTokenizer for SimpleTokenizer {
    fn tokenize(&self, label: &str, _language: Option<&str>) -> Vec<String> {
        label
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn name(&self) -> &str {
        "simple"
    }
}

/// Tokenizer based on Unicode word boundaries.
///
/// Keeps contractions like `"don't"` together and splits scripts without
/// whitespace at word boundaries. Punctuation-only segments are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordTokenizer;

impl LabelTokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, label: &str, _language: Option<&str>) -> Vec<String> {
        label.unicode_words().map(str::to_string).collect()
    }

    fn name(&self) -> &str {
        "unicode-words"
    }
}

/// Dispatches to a tokenizer registered for the label's language.
///
/// Languages are matched on their primary subtag, case-insensitively
/// (`"en-GB"` uses the tokenizer registered for `"en"`). Labels without a
/// language, or in a language with no registered tokenizer, go to the
/// fallback.
#[derive(Clone)]
pub struct LanguageTokenizer {
    by_language: HashMap<String, SharedTokenizer>,
    fallback: SharedTokenizer,
}

impl LanguageTokenizer {
    /// Create a dispatcher with [`SimpleTokenizer`] as fallback.
    pub fn new() -> Self {
        Self::with_fallback(Arc::new(SimpleTokenizer))
    }

    pub fn with_fallback(fallback: SharedTokenizer) -> Self {
        Self {
            by_language: HashMap::new(),
            fallback,
        }
    }

    /// Register a tokenizer for a language.
    pub fn register(mut self, language: &str, tokenizer: SharedTokenizer) -> Self {
        self.by_language.insert(primary_subtag(language), tokenizer);
        self
    }

    /// Whether a dedicated tokenizer exists for the language.
    pub fn supports(&self, language: &str) -> bool {
        self.by_language.contains_key(&primary_subtag(language))
    }

    fn select(&self, language: Option<&str>) -> &SharedTokenizer {
        language
            .and_then(|lang| self.by_language.get(&primary_subtag(lang)))
            .unwrap_or(&self.fallback)
    }
}

impl Default for LanguageTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelTokenizer for LanguageTokenizer {
    fn tokenize(&self, label: &str, language: Option<&str>) -> Vec<String> {
        self.select(language).tokenize(label, language)
    }

    fn name(&self) -> &str {
        "language"
    }
}

fn primary_subtag(language: &str) -> String {
    language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}
