//! Configuration file model.
//!
//! Every value is optional so that layers can be merged field by field:
//! a project file only needs to mention what it changes. Conversion into
//! the runtime value objects fills the gaps with their defaults and
//! validates the result.
//!
//! ```toml
//! [text_processing]
//! lexical_categories = ["noun"]
//! pos = []
//! min_search_token_length = 3
//!
//! [linker]
//! redirect_mode = "follow"
//! max_suggestions = 3
//! search_timeout_ms = 2000
//!
//! [search]
//! knowledge_base = "kb.json"
//! label_field = "http://www.w3.org/2004/02/skos/core#prefLabel"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use entlink_linker::{EntityLinkerConfig, RedirectMode};
use entlink_nlp::{
    LanguageTokenizer, LexicalCategory, Pos, SharedTokenizer, SimpleTokenizer,
    TextProcessingConfig, UnicodeWordTokenizer,
};
use entlink_search::FieldMapping;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntlinkConfig {
    pub text_processing: TextProcessingSection,
    pub linker: LinkerSection,
    pub search: SearchSection,
}

impl EntlinkConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: EntlinkConfig) {
        self.text_processing.merge(other.text_processing);
        self.linker.merge(other.linker);
        self.search.merge(other.search);
    }

    /// Resolve relative paths against the directory of the file they were
    /// read from.
    pub fn resolve_paths(&mut self, base: &Path) {
        if let Some(kb) = &self.search.knowledge_base
            && kb.is_relative()
        {
            self.search.knowledge_base = Some(base.join(kb));
        }
    }
}

/// `[text_processing]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextProcessingSection {
    /// Lexical category names, e.g. `"noun"`.
    pub lexical_categories: Option<Vec<String>>,
    /// Part of speech names, e.g. `"proper_noun"`.
    pub pos: Option<Vec<String>>,
    /// Raw tagset strings, e.g. `"NNP"`.
    pub pos_tags: Option<Vec<String>>,
    /// Phrase category names whose chunks bound mentions.
    pub phrase_categories: Option<Vec<String>>,
    /// Lexical category names that complete a chunk mention without
    /// triggering one.
    pub matched_categories: Option<Vec<String>>,
    pub min_search_token_length: Option<usize>,
    pub case_sensitive: Option<bool>,
    pub min_pos_probability: Option<f64>,
}

impl TextProcessingSection {
    fn merge(&mut self, other: Self) {
        merge_field(&mut self.lexical_categories, other.lexical_categories);
        merge_field(&mut self.pos, other.pos);
        merge_field(&mut self.pos_tags, other.pos_tags);
        merge_field(&mut self.phrase_categories, other.phrase_categories);
        merge_field(&mut self.matched_categories, other.matched_categories);
        merge_field(&mut self.min_search_token_length, other.min_search_token_length);
        merge_field(&mut self.case_sensitive, other.case_sensitive);
        merge_field(&mut self.min_pos_probability, other.min_pos_probability);
    }

    /// Build and validate the text processing configuration.
    pub fn to_text_processing_config(&self) -> Result<TextProcessingConfig> {
        let mut config = TextProcessingConfig::default();
        if let Some(names) = &self.lexical_categories {
            config.processed_lexical_categories =
                parse_names(names, "text_processing.lexical_categories", LexicalCategory::from_name)?;
        }
        if let Some(names) = &self.pos {
            config.processed_pos = parse_names(names, "text_processing.pos", Pos::from_name)?;
        }
        if let Some(tags) = &self.pos_tags {
            config.processed_pos_tags = tags.iter().cloned().collect();
        }
        if let Some(names) = &self.phrase_categories {
            config.processed_phrase_categories = parse_names(
                names,
                "text_processing.phrase_categories",
                LexicalCategory::from_name,
            )?;
        }
        if let Some(names) = &self.matched_categories {
            config.matched_lexical_categories = parse_names(
                names,
                "text_processing.matched_categories",
                LexicalCategory::from_name,
            )?;
        }
        if let Some(len) = self.min_search_token_length {
            config.min_search_token_length = len;
        }
        if let Some(case_sensitive) = self.case_sensitive {
            config.case_sensitive_matching = case_sensitive;
        }
        if let Some(probability) = self.min_pos_probability {
            config.min_pos_probability = probability;
        }
        config.validate()?;
        Ok(config)
    }
}

/// `[linker]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerSection {
    /// `"ignore"`, `"add"` or `"follow"`.
    pub redirect_mode: Option<String>,
    pub max_suggestions: Option<usize>,
    pub min_match_factor: Option<f32>,
    /// Type URIs; suggestions must have at least one of them.
    pub type_constraints: Option<Vec<String>>,
    pub search_timeout_ms: Option<u64>,
    pub max_concurrent_searches: Option<usize>,
}

impl LinkerSection {
    fn merge(&mut self, other: Self) {
        merge_field(&mut self.redirect_mode, other.redirect_mode);
        merge_field(&mut self.max_suggestions, other.max_suggestions);
        merge_field(&mut self.min_match_factor, other.min_match_factor);
        merge_field(&mut self.type_constraints, other.type_constraints);
        merge_field(&mut self.search_timeout_ms, other.search_timeout_ms);
        merge_field(&mut self.max_concurrent_searches, other.max_concurrent_searches);
    }

    /// Build and validate the linker configuration.
    pub fn to_linker_config(&self) -> Result<EntityLinkerConfig> {
        let mut config = EntityLinkerConfig::default();
        if let Some(mode) = &self.redirect_mode {
            config.redirect_mode = mode
                .parse::<RedirectMode>()
                .map_err(|_| ConfigError::unknown_value("linker.redirect_mode", mode))?;
        }
        if let Some(max) = self.max_suggestions {
            config.max_suggestions = max;
        }
        if let Some(factor) = self.min_match_factor {
            config.min_match_factor = factor;
        }
        if let Some(types) = &self.type_constraints {
            config = config.with_type_constraints(types.iter().cloned());
        }
        if let Some(ms) = self.search_timeout_ms {
            config.search_timeout = Duration::from_millis(ms);
        }
        if let Some(max) = self.max_concurrent_searches {
            config.max_concurrent_searches = max;
        }
        config.validate()?;
        Ok(config)
    }
}

/// `[search]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub label_field: Option<String>,
    pub type_field: Option<String>,
    pub redirect_field: Option<String>,
    /// Path of a JSON knowledge base file.
    pub knowledge_base: Option<PathBuf>,
    /// `"simple"` or `"unicode-words"`.
    pub tokenizer: Option<String>,
}

impl SearchSection {
    fn merge(&mut self, other: Self) {
        merge_field(&mut self.label_field, other.label_field);
        merge_field(&mut self.type_field, other.type_field);
        merge_field(&mut self.redirect_field, other.redirect_field);
        merge_field(&mut self.knowledge_base, other.knowledge_base);
        merge_field(&mut self.tokenizer, other.tokenizer);
    }

    /// Field names, defaults for anything unset.
    pub fn field_mapping(&self) -> FieldMapping {
        let defaults = FieldMapping::default();
        FieldMapping {
            label_field: self.label_field.clone().unwrap_or(defaults.label_field),
            type_field: self.type_field.clone().unwrap_or(defaults.type_field),
            redirect_field: self.redirect_field.clone().unwrap_or(defaults.redirect_field),
        }
    }

    /// The configured label tokenizer, used as fallback of a
    /// [`LanguageTokenizer`].
    pub fn tokenizer(&self) -> Result<SharedTokenizer> {
        let fallback: SharedTokenizer = match self.tokenizer.as_deref() {
            None | Some("simple") => Arc::new(SimpleTokenizer),
            Some("unicode-words") => Arc::new(UnicodeWordTokenizer),
            Some(other) => return Err(ConfigError::unknown_value("search.tokenizer", other)),
        };
        Ok(Arc::new(LanguageTokenizer::with_fallback(fallback)))
    }
}

fn merge_field<T>(base: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *base = other;
    }
}

fn parse_names<T: Ord>(
    names: &[String],
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<std::collections::BTreeSet<T>> {
    names
        .iter()
        .map(|name| parse(name).ok_or_else(|| ConfigError::unknown_value(field, name)))
        .collect()
}
