//! Text side of entity linking.
//!
//! This crate holds everything the linker needs to know about the input
//! document before any knowledge base is consulted:
//!
//! - [`AnalysedText`]: text plus sentence, chunk and token annotations
//! - [`pos`]: tagset-independent part-of-speech vocabulary
//! - [`LabelTokenizer`]: splits mentions and entity labels into tokens
//! - [`select`]: picks the mentions worth searching for, driven by a
//!   [`TextProcessingConfig`]
//!
//! # Usage
//!
//! ```
//! use entlink_nlp::{select, AnalysedText, Pos, PosTag, TextProcessingConfig};
//!
//! let mut at = AnalysedText::new("Patrick Marshall visited Dunedin");
//! at.add_token(0, 7).annotate_pos(PosTag::new("NP", Pos::ProperNoun), 1.0);
//! at.add_token(8, 16).annotate_pos(PosTag::new("NP", Pos::ProperNoun), 1.0);
//! at.add_token(17, 24).annotate_pos(PosTag::new("VVD", Pos::MainVerb), 1.0);
//! at.add_token(25, 32).annotate_pos(PosTag::new("NP", Pos::ProperNoun), 1.0);
//!
//! let selection = select(&at, &TextProcessingConfig::default());
//! let mentions: Vec<&str> = selection.mentions.iter().map(|m| m.text.as_str()).collect();
//! assert_eq!(mentions, vec!["Patrick Marshall", "Dunedin"]);
//! ```

pub mod error;
pub mod filter;
pub mod normalize;
pub mod pos;
pub mod text;
pub mod tokenizer;

pub use error::{NlpError, Result};
pub use filter::{
    select, MentionCandidate, MentionToken, Selection, TextProcessingConfig,
    DEFAULT_MATCHED_LEXICAL_CATEGORIES, DEFAULT_MIN_POS_PROBABILITY, DEFAULT_MIN_SEARCH_TOKEN_LENGTH,
    DEFAULT_PROCESSED_LEXICAL_CATEGORIES, DEFAULT_PROCESSED_PHRASE_CATEGORIES,
    DEFAULT_PROCESSED_POS,
};
pub use pos::{LexicalCategory, PhraseTag, Pos, PosTag};
pub use text::{AnalysedText, Annotation, Chunk, Span, Token};
pub use tokenizer::{
    LabelTokenizer, LanguageTokenizer, SharedTokenizer, SimpleTokenizer, UnicodeWordTokenizer,
};
