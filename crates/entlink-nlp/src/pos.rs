//! Part-of-speech and lexical category vocabulary.
//!
//! Tokens carry [`PosTag`] annotations. A tag has a tagset-specific string
//! (e.g. `"NP"`), zero or more fine grained [`Pos`] values and optional
//! explicit [`LexicalCategory`] values. The categories implied by each `Pos`
//! are folded in by [`PosTag::lexical_categories`], so a filter configured
//! for `Noun` accepts both `ProperNoun` and `CommonNoun` tokens.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Coarse word classes used to configure which tokens get linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LexicalCategory {
    Noun,
    Verb,
    Adjective,
    Adverb,
    PronounOrDeterminer,
    Adposition,
    Conjunction,
    Quantifier,
    Interjection,
    Punctuation,
    Residual,
}

impl LexicalCategory {
    /// Parse a category from its snake_case name (as used in config files).
    pub fn from_name(name: &str) -> Option<Self> {
        let category = match name.trim().to_ascii_lowercase().as_str() {
            "noun" => Self::Noun,
            "verb" => Self::Verb,
            "adjective" => Self::Adjective,
            "adverb" => Self::Adverb,
            "pronoun_or_determiner" => Self::PronounOrDeterminer,
            "adposition" => Self::Adposition,
            "conjunction" => Self::Conjunction,
            "quantifier" => Self::Quantifier,
            "interjection" => Self::Interjection,
            "punctuation" => Self::Punctuation,
            "residual" => Self::Residual,
            _ => return None,
        };
        Some(category)
    }
}

/// Fine grained part-of-speech values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pos {
    ProperNoun,
    CommonNoun,
    Abbreviation,
    MainVerb,
    AuxiliaryVerb,
    Participle,
    Adjective,
    Adverb,
    PersonalPronoun,
    Article,
    Determiner,
    Preposition,
    Conjunction,
    Numeral,
    Interjection,
    Point,
    Comma,
    Hyphen,
    OpenBracket,
    CloseBracket,
    Foreign,
}

impl Pos {
    /// Lexical categories implied by this part of speech.
    pub fn categories(self) -> &'static [LexicalCategory] {
        use LexicalCategory as C;
        match self {
            Pos::ProperNoun | Pos::CommonNoun => &[C::Noun],
            Pos::Abbreviation | Pos::Foreign => &[C::Residual],
            Pos::MainVerb | Pos::AuxiliaryVerb => &[C::Verb],
            Pos::Participle => &[C::Verb, C::Adjective],
            Pos::Adjective => &[C::Adjective],
            Pos::Adverb => &[C::Adverb],
            Pos::PersonalPronoun | Pos::Article | Pos::Determiner => &[C::PronounOrDeterminer],
            Pos::Preposition => &[C::Adposition],
            Pos::Conjunction => &[C::Conjunction],
            Pos::Numeral => &[C::Quantifier],
            Pos::Interjection => &[C::Interjection],
            Pos::Point | Pos::Comma | Pos::Hyphen | Pos::OpenBracket | Pos::CloseBracket => {
                &[C::Punctuation]
            }
        }
    }

    /// Parse a part of speech from its snake_case name.
    pub fn from_name(name: &str) -> Option<Self> {
        let pos = match name.trim().to_ascii_lowercase().as_str() {
            "proper_noun" => Self::ProperNoun,
            "common_noun" => Self::CommonNoun,
            "abbreviation" => Self::Abbreviation,
            "main_verb" => Self::MainVerb,
            "auxiliary_verb" => Self::AuxiliaryVerb,
            "participle" => Self::Participle,
            "adjective" => Self::Adjective,
            "adverb" => Self::Adverb,
            "personal_pronoun" => Self::PersonalPronoun,
            "article" => Self::Article,
            "determiner" => Self::Determiner,
            "preposition" => Self::Preposition,
            "conjunction" => Self::Conjunction,
            "numeral" => Self::Numeral,
            "interjection" => Self::Interjection,
            "point" => Self::Point,
            "comma" => Self::Comma,
            "hyphen" => Self::Hyphen,
            "open_bracket" => Self::OpenBracket,
            "close_bracket" => Self::CloseBracket,
            "foreign" => Self::Foreign,
            _ => return None,
        };
        Some(pos)
    }
}

/// A part-of-speech tag as emitted by a tagger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosTag {
    /// Tagset-specific tag string (e.g. `"NP"`, `"NN"`).
    pub tag: String,
    /// Fine grained parts of speech this tag maps to.
    #[serde(default)]
    pub pos: BTreeSet<Pos>,
    /// Explicit lexical categories (in addition to those implied by `pos`).
    #[serde(default)]
    pub categories: BTreeSet<LexicalCategory>,
}

impl PosTag {
    /// Create a tag mapped to a single part of speech.
    pub fn new(tag: impl Into<String>, pos: Pos) -> Self {
        Self {
            tag: tag.into(),
            pos: BTreeSet::from([pos]),
            categories: BTreeSet::new(),
        }
    }

    /// Create a tag that only carries a lexical category.
    pub fn with_category(tag: impl Into<String>, category: LexicalCategory) -> Self {
        Self {
            tag: tag.into(),
            pos: BTreeSet::new(),
            categories: BTreeSet::from([category]),
        }
    }

    /// Create a tag without any mapping (tagset string only).
    pub fn unmapped(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            pos: BTreeSet::new(),
            categories: BTreeSet::new(),
        }
    }

    /// All lexical categories of this tag, explicit and implied.
    pub fn lexical_categories(&self) -> BTreeSet<LexicalCategory> {
        let mut all = self.categories.clone();
        for pos in &self.pos {
            all.extend(pos.categories().iter().copied());
        }
        all
    }

    /// Whether this tag maps to the given part of speech.
    pub fn has_pos(&self, pos: Pos) -> bool {
        self.pos.contains(&pos)
    }
}

/// Phrase (chunk) tag, e.g. `NP` for noun phrases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseTag {
    pub tag: String,
    #[serde(default)]
    pub category: Option<LexicalCategory>,
}

impl PhraseTag {
    pub fn new(tag: impl Into<String>, category: LexicalCategory) -> Self {
        Self {
            tag: tag.into(),
            category: Some(category),
        }
    }
}
