//! Mention selection over annotated text.
//!
//! [`select`] walks sentences, chunks and tokens in document order and
//! groups tokens into [`MentionCandidate`]s. A token is *processable* when
//! its POS annotations match the [`TextProcessingConfig`], and *matchable*
//! when it is processable or belongs to a matched lexical category (nouns
//! by default):
//!
//! - a chunk holding a processable token forms one mention running from
//!   its first to its last matchable token, so "University" joins "Otago"
//!   even when only proper nouns are processed, and connectors like "of"
//!   stay inside "University of Otago";
//! - outside chunks, each maximal run of processable tokens separated by
//!   nothing but whitespace is a mention;
//! - mentions never cross a chunk or sentence boundary.
//!
//! Annotations with invalid spans are skipped and reported in
//! [`Selection::invalid_spans`] instead of failing the whole document.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{NlpError, Result};
use crate::normalize::normalize_surface;
use crate::pos::{LexicalCategory, Pos, PosTag};
use crate::text::{AnalysedText, Chunk, Span, Token};

/// Lexical categories processed when nothing else is configured.
pub const DEFAULT_PROCESSED_LEXICAL_CATEGORIES: &[LexicalCategory] = &[LexicalCategory::Noun];

/// Parts of speech processed when nothing else is configured.
pub const DEFAULT_PROCESSED_POS: &[Pos] = &[Pos::ProperNoun];

/// Phrase categories whose chunks bound mentions by default.
pub const DEFAULT_PROCESSED_PHRASE_CATEGORIES: &[LexicalCategory] = &[LexicalCategory::Noun];

/// Lexical categories that may complete a chunk mention by default.
pub const DEFAULT_MATCHED_LEXICAL_CATEGORIES: &[LexicalCategory] = &[LexicalCategory::Noun];

/// Default minimum length (in chars) of a normalized mention text.
pub const DEFAULT_MIN_SEARCH_TOKEN_LENGTH: usize = 3;

/// Default minimum probability for a POS annotation to be considered.
pub const DEFAULT_MIN_POS_PROBABILITY: f64 = 0.75;

/// Which tokens are eligible for linking.
///
/// If the category, POS and tag sets are all empty no token is ever
/// selected: an explicit "nothing to link" configuration, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextProcessingConfig {
    /// Tokens with a POS annotation in one of these categories are processed.
    pub processed_lexical_categories: BTreeSet<LexicalCategory>,
    /// Tokens with a POS annotation mapping to one of these are processed.
    pub processed_pos: BTreeSet<Pos>,
    /// Tokens whose raw tagset string is listed here are processed.
    pub processed_pos_tags: BTreeSet<String>,
    /// Chunks annotated with a phrase category outside this set are ignored
    /// as mention boundaries.
    pub processed_phrase_categories: BTreeSet<LexicalCategory>,
    /// Tokens in these categories join a chunk mention triggered by a
    /// processable token, without triggering one themselves.
    pub matched_lexical_categories: BTreeSet<LexicalCategory>,
    /// Mentions whose normalized text is shorter than this are dropped.
    pub min_search_token_length: usize,
    /// Whether surface texts differing only in case are distinct mentions.
    pub case_sensitive_matching: bool,
    /// POS annotations below this probability are ignored.
    pub min_pos_probability: f64,
}

impl Default for TextProcessingConfig {
    fn default() -> Self {
        Self {
            processed_lexical_categories: DEFAULT_PROCESSED_LEXICAL_CATEGORIES
                .iter()
                .copied()
                .collect(),
            processed_pos: DEFAULT_PROCESSED_POS.iter().copied().collect(),
            processed_pos_tags: BTreeSet::new(),
            processed_phrase_categories: DEFAULT_PROCESSED_PHRASE_CATEGORIES
                .iter()
                .copied()
                .collect(),
            matched_lexical_categories: DEFAULT_MATCHED_LEXICAL_CATEGORIES
                .iter()
                .copied()
                .collect(),
            min_search_token_length: DEFAULT_MIN_SEARCH_TOKEN_LENGTH,
            case_sensitive_matching: false,
            min_pos_probability: DEFAULT_MIN_POS_PROBABILITY,
        }
    }
}

impl TextProcessingConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the processed lexical categories.
    pub fn with_lexical_categories(
        mut self,
        categories: impl IntoIterator<Item = LexicalCategory>,
    ) -> Self {
        self.processed_lexical_categories = categories.into_iter().collect();
        self
    }

    /// Replace the processed parts of speech.
    pub fn with_pos(mut self, pos: impl IntoIterator<Item = Pos>) -> Self {
        self.processed_pos = pos.into_iter().collect();
        self
    }

    /// Replace the processed raw tag strings.
    pub fn with_pos_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.processed_pos_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the lexical categories that may complete a chunk mention.
    pub fn with_matched_lexical_categories(
        mut self,
        categories: impl IntoIterator<Item = LexicalCategory>,
    ) -> Self {
        self.matched_lexical_categories = categories.into_iter().collect();
        self
    }

    pub fn with_min_search_token_length(mut self, len: usize) -> Self {
        self.min_search_token_length = len;
        self
    }

    pub fn with_case_sensitive_matching(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive_matching = case_sensitive;
        self
    }

    pub fn with_min_pos_probability(mut self, probability: f64) -> Self {
        self.min_pos_probability = probability;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_pos_probability) {
            return Err(NlpError::config(format!(
                "min_pos_probability must be within [0,1], got {}",
                self.min_pos_probability
            )));
        }
        Ok(())
    }

    /// Whether this configuration can select any token at all.
    pub fn selects_anything(&self) -> bool {
        !(self.processed_lexical_categories.is_empty()
            && self.processed_pos.is_empty()
            && self.processed_pos_tags.is_empty())
    }

    /// Whether a token is processable under this configuration.
    pub fn is_processable(&self, token: &Token) -> bool {
        self.confident_tags(token).any(|tag| {
            self.processed_pos_tags.contains(&tag.tag)
                || tag.pos.iter().any(|p| self.processed_pos.contains(p))
                || tag
                    .lexical_categories()
                    .iter()
                    .any(|c| self.processed_lexical_categories.contains(c))
        })
    }

    /// Whether a token may be part of a chunk mention.
    pub fn is_matchable(&self, token: &Token) -> bool {
        self.is_processable(token)
            || self.confident_tags(token).any(|tag| {
                tag.lexical_categories()
                    .iter()
                    .any(|c| self.matched_lexical_categories.contains(c))
            })
    }

    fn confident_tags<'a>(&'a self, token: &'a Token) -> impl Iterator<Item = &'a PosTag> + 'a {
        token
            .pos
            .iter()
            .filter(|a| a.probability >= self.min_pos_probability)
            .map(|a| &a.value)
    }

    fn bounds_mentions(&self, chunk: &Chunk) -> bool {
        match chunk.phrase.as_ref().and_then(|p| p.value.category) {
            Some(category) => self.processed_phrase_categories.contains(&category),
            None => true,
        }
    }
}

/// A token as seen by the linker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MentionToken {
    pub span: Span,
    pub text: String,
    pub processable: bool,
    pub matchable: bool,
}

/// A span of text judged eligible for entity resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MentionCandidate {
    /// From the first to the last token of the mention.
    pub span: Span,
    /// Exact substring of the source text.
    pub text: String,
    /// Tokens covered by `span`.
    pub tokens: Vec<MentionToken>,
    /// Tokens of the enclosing chunk, or of the run when outside chunks.
    pub context: Vec<MentionToken>,
    /// Index of `tokens[0]` within `context`.
    pub context_offset: usize,
}

impl MentionCandidate {
    /// Index one past the last mention token within `context`.
    pub fn context_end(&self) -> usize {
        self.context_offset + self.tokens.len()
    }
}

/// Output of [`select`].
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Mentions in document order.
    pub mentions: Vec<MentionCandidate>,
    /// Annotations skipped because their span was invalid.
    pub invalid_spans: Vec<NlpError>,
}

/// Select mention candidates from annotated text.
pub fn select(text: &AnalysedText, config: &TextProcessingConfig) -> Selection {
    let mut selection = Selection::default();
    if !config.selects_anything() {
        debug!("No lexical categories or POS configured, nothing to select");
        return selection;
    }

    let mut keep = |span: &Span, kind: &str| match text.validate_span(span) {
        Ok(()) => true,
        Err(e) => {
            warn!(kind, %span, error = %e, "Skipping annotation with invalid span");
            selection.invalid_spans.push(e);
            false
        }
    };

    let sentences: Vec<Span> = text
        .sentences()
        .into_iter()
        .filter(|s| keep(s, "sentence"))
        .collect();
    let chunks: Vec<&Chunk> = text
        .chunks()
        .into_iter()
        .filter(|c| keep(&c.span, "chunk"))
        .filter(|c| config.bounds_mentions(c))
        .collect();
    let tokens: Vec<&Token> = text
        .tokens()
        .into_iter()
        .filter(|t| keep(&t.span, "token"))
        .collect();

    // Sentences, chunks and tokens are sorted by span, so one forward pass
    // with a cursor per list assigns every token.
    let mut token_cursor = 0;
    let mut chunk_cursor = 0;
    for sentence in &sentences {
        while token_cursor < tokens.len() && tokens[token_cursor].span.start < sentence.start {
            token_cursor += 1;
        }

        // (token, chunk index) in document order
        let mut sentence_tokens: Vec<(MentionToken, Option<usize>)> = Vec::new();
        while token_cursor < tokens.len() && tokens[token_cursor].span.start < sentence.end {
            let token = tokens[token_cursor];
            token_cursor += 1;
            if !sentence.contains(&token.span) {
                continue;
            }
            while chunk_cursor < chunks.len() && chunks[chunk_cursor].span.end <= token.span.start
            {
                chunk_cursor += 1;
            }
            let chunk = chunks
                .get(chunk_cursor)
                .filter(|c| c.span.contains(&token.span) && sentence.contains(&c.span))
                .map(|_| chunk_cursor);
            sentence_tokens.push((mention_token(text, token, config), chunk));
        }

        let mut start = 0;
        while start < sentence_tokens.len() {
            let chunk = sentence_tokens[start].1;
            let mut end = start + 1;
            while end < sentence_tokens.len() && sentence_tokens[end].1 == chunk {
                end += 1;
            }
            let group: Vec<MentionToken> = sentence_tokens[start..end]
                .iter()
                .map(|(t, _)| t.clone())
                .collect();
            match chunk {
                Some(_) => collect_chunk_mention(text, config, group, &mut selection.mentions),
                None => collect_free_mentions(text, config, group, &mut selection.mentions),
            }
            start = end;
        }
    }

    debug!(
        mentions = selection.mentions.len(),
        invalid = selection.invalid_spans.len(),
        "Mention selection complete"
    );
    selection
}

fn mention_token(text: &AnalysedText, token: &Token, config: &TextProcessingConfig) -> MentionToken {
    MentionToken {
        span: token.span,
        text: text.slice(&token.span).unwrap_or_default().to_string(),
        processable: config.is_processable(token),
        matchable: config.is_matchable(token),
    }
}

fn collect_chunk_mention(
    text: &AnalysedText,
    config: &TextProcessingConfig,
    context: Vec<MentionToken>,
    out: &mut Vec<MentionCandidate>,
) {
    if !context.iter().any(|t| t.processable) {
        return;
    }
    let first = context.iter().position(|t| t.matchable);
    let last = context.iter().rposition(|t| t.matchable);
    if let (Some(first), Some(last)) = (first, last) {
        push_mention(text, config, context, first, last + 1, out);
    }
}

fn collect_free_mentions(
    text: &AnalysedText,
    config: &TextProcessingConfig,
    tokens: Vec<MentionToken>,
    out: &mut Vec<MentionCandidate>,
) {
    let mut run: Vec<MentionToken> = Vec::new();
    for token in tokens {
        let continues = token.processable
            && run
                .last()
                .is_none_or(|prev| only_whitespace_between(text, &prev.span, &token.span));
        if !continues {
            push_run(text, config, std::mem::take(&mut run), out);
        }
        if token.processable {
            run.push(token);
        }
    }
    push_run(text, config, run, out);
}

fn push_run(
    text: &AnalysedText,
    config: &TextProcessingConfig,
    run: Vec<MentionToken>,
    out: &mut Vec<MentionCandidate>,
) {
    if !run.is_empty() {
        let len = run.len();
        push_mention(text, config, run, 0, len, out);
    }
}

/// Untokenized text other than whitespace ends a run.
fn only_whitespace_between(text: &AnalysedText, prev: &Span, next: &Span) -> bool {
    text.text()
        .get(prev.end..next.start)
        .is_some_and(|gap| gap.chars().all(char::is_whitespace))
}

fn push_mention(
    text: &AnalysedText,
    config: &TextProcessingConfig,
    context: Vec<MentionToken>,
    from: usize,
    to: usize,
    out: &mut Vec<MentionCandidate>,
) {
    let span = Span::new(context[from].span.start, context[to - 1].span.end);
    let Some(surface) = text.slice(&span) else {
        return;
    };
    let normalized = normalize_surface(surface, config.case_sensitive_matching);
    if normalized.chars().count() < config.min_search_token_length {
        trace!(mention = surface, "Mention shorter than min_search_token_length");
        return;
    }
    out.push(MentionCandidate {
        span,
        text: surface.to_string(),
        tokens: context[from..to].to_vec(),
        context_offset: from,
        context,
    });
}
