//! Annotated text model.
//!
//! [`AnalysedText`] is the hand-off structure produced by an upstream
//! linguistic pipeline: the plain text plus sentence, chunk and token spans
//! with their annotations. Spans are half-open byte ranges into `text`.
//!
//! ```
//! use entlink_nlp::{AnalysedText, Pos, PosTag};
//!
//! let mut at = AnalysedText::new("Visit New Zealand.");
//! at.add_sentence(0, 18);
//! at.add_token(6, 9).annotate_pos(PosTag::new("NN", Pos::CommonNoun), 1.0);
//! at.add_token(10, 17).annotate_pos(PosTag::new("NP", Pos::ProperNoun), 1.0);
//! assert_eq!(at.tokens().len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{NlpError, Result};
use crate::pos::{PhraseTag, PosTag};

/// A half-open `[start, end)` byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes (zero for inverted spans).
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `other` lies completely inside this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{})", self.start, self.end)
    }
}

/// An annotation value together with the confidence of the annotator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation<T> {
    pub value: T,
    /// Confidence in `[0, 1]`.
    #[serde(default = "default_probability")]
    pub probability: f64,
}

fn default_probability() -> f64 {
    1.0
}

impl<T> Annotation<T> {
    pub fn new(value: T, probability: f64) -> Self {
        Self { value, probability }
    }
}

/// A token with its part-of-speech annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub span: Span,
    #[serde(default)]
    pub pos: Vec<Annotation<PosTag>>,
}

impl Token {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            pos: Vec::new(),
        }
    }

    /// Attach a POS annotation.
    pub fn annotate_pos(&mut self, tag: PosTag, probability: f64) -> &mut Self {
        self.pos.push(Annotation::new(tag, probability));
        self
    }
}

/// A chunk (phrase) such as a noun phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub span: Span,
    #[serde(default)]
    pub phrase: Option<Annotation<PhraseTag>>,
}

impl Chunk {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            phrase: None,
        }
    }

    /// Set the phrase annotation.
    pub fn annotate_phrase(&mut self, tag: PhraseTag, probability: f64) -> &mut Self {
        self.phrase = Some(Annotation::new(tag, probability));
        self
    }
}

/// Plain text plus its linguistic annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysedText {
    text: String,
    #[serde(default)]
    sentences: Vec<Span>,
    #[serde(default)]
    chunks: Vec<Chunk>,
    #[serde(default)]
    tokens: Vec<Token>,
}

impl AnalysedText {
    /// Create an analysed text without any annotations.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn add_sentence(&mut self, start: usize, end: usize) -> &mut Self {
        self.sentences.push(Span::new(start, end));
        self
    }

    pub fn add_chunk(&mut self, start: usize, end: usize) -> &mut Chunk {
        self.chunks.push(Chunk::new(start, end));
        let last = self.chunks.len() - 1;
        &mut self.chunks[last]
    }

    pub fn add_token(&mut self, start: usize, end: usize) -> &mut Token {
        self.tokens.push(Token::new(start, end));
        let last = self.tokens.len() - 1;
        &mut self.tokens[last]
    }

    /// Sentences in document order. Falls back to a single sentence
    /// covering the whole text when none are annotated.
    pub fn sentences(&self) -> Vec<Span> {
        if self.sentences.is_empty() {
            return if self.text.is_empty() {
                Vec::new()
            } else {
                vec![Span::new(0, self.text.len())]
            };
        }
        let mut sentences = self.sentences.clone();
        sentences.sort();
        sentences
    }

    /// Chunks in document order.
    pub fn chunks(&self) -> Vec<&Chunk> {
        let mut chunks: Vec<&Chunk> = self.chunks.iter().collect();
        chunks.sort_by_key(|c| c.span);
        chunks
    }

    /// Tokens in document order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut tokens: Vec<&Token> = self.tokens.iter().collect();
        tokens.sort_by_key(|t| t.span);
        tokens
    }

    /// Check `start < end <= len` and char boundaries.
    pub fn validate_span(&self, span: &Span) -> Result<()> {
        if span.start >= span.end || span.end > self.text.len() {
            return Err(NlpError::invalid_span(*span, self.text.len()));
        }
        if !self.text.is_char_boundary(span.start) || !self.text.is_char_boundary(span.end) {
            return Err(NlpError::NotCharBoundary {
                start: span.start,
                end: span.end,
            });
        }
        Ok(())
    }

    /// The text covered by a span, if the span is valid.
    pub fn slice(&self, span: &Span) -> Option<&str> {
        self.validate_span(span).ok().map(|_| &self.text[span.start..span.end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::{LexicalCategory, Pos};

    #[test]
    fn test_default_sentence_covers_text() {
        let at = AnalysedText::new("Hello world");
        assert_eq!(at.sentences(), vec![Span::new(0, 11)]);
    }

    #[test]
    fn test_empty_text_has_no_sentence() {
        let at = AnalysedText::new("");
        assert!(at.sentences().is_empty());
    }

    #[test]
    fn test_tokens_sorted_by_offset() {
        let mut at = AnalysedText::new("one two three");
        at.add_token(8, 13);
        at.add_token(0, 3);
        at.add_token(4, 7);
        let starts: Vec<usize> = at.tokens().iter().map(|t| t.span.start).collect();
        assert_eq!(starts, vec![0, 4, 8]);
    }

    #[test]
    fn test_validate_span() {
        let at = AnalysedText::new("abc");
        assert!(at.validate_span(&Span::new(0, 3)).is_ok());
        assert!(at.validate_span(&Span::new(2, 2)).is_err());
        assert!(at.validate_span(&Span::new(1, 4)).is_err());
    }

    #[test]
    fn test_validate_span_char_boundary() {
        let at = AnalysedText::new("Zürich");
        // 'ü' occupies bytes 1..3
        assert!(matches!(
            at.validate_span(&Span::new(0, 2)),
            Err(NlpError::NotCharBoundary { .. })
        ));
        assert_eq!(at.slice(&Span::new(0, 3)), Some("Zü"));
    }

    #[test]
    fn test_builder_annotations() {
        let mut at = AnalysedText::new("New Zealand");
        at.add_chunk(0, 11)
            .annotate_phrase(PhraseTag::new("NP", LexicalCategory::Noun), 1.0);
        at.add_token(0, 3)
            .annotate_pos(PosTag::new("NN", Pos::CommonNoun), 0.9);
        assert_eq!(at.chunks()[0].phrase.as_ref().unwrap().value.tag, "NP");
        assert_eq!(at.tokens()[0].pos[0].probability, 0.9);
    }

    #[test]
    fn test_span_helpers() {
        let a = Span::new(2, 5);
        let b = Span::new(4, 9);
        assert!(!a.contains(&b));
        assert!(Span::new(0, 10).contains(&a));
        assert_eq!(a.len(), 3);
        assert_eq!(a.to_string(), "[2,5)");
    }

    #[test]
    fn test_deserialize_minimal_document() {
        let json = r#"{
            "text": "Otago",
            "tokens": [{"span": {"start": 0, "end": 5},
                        "pos": [{"value": {"tag": "NP", "pos": ["proper_noun"]}}]}]
        }"#;
        let at: AnalysedText = serde_json::from_str(json).unwrap();
        assert_eq!(at.tokens().len(), 1);
        assert_eq!(at.tokens()[0].pos[0].probability, 1.0);
        assert!(at.chunks().is_empty());
    }
}
