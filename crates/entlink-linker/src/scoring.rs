//! Label matching and suggestion ranking.

use std::collections::HashSet;

use entlink_nlp::LabelTokenizer;
use entlink_nlp::normalize::fold;
use entlink_search::{Entity, FieldMapping};

use crate::model::Suggestion;

/// The label of an entity that best matches a mention.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMatch {
    pub label: String,
    /// Fraction of mention tokens found in the label.
    pub factor: f32,
}

/// Tokenize and fold a text.
pub fn folded_tokens(
    tokenizer: &dyn LabelTokenizer,
    text: &str,
    language: Option<&str>,
) -> Vec<String> {
    tokenizer
        .tokenize(text, language)
        .iter()
        .map(|t| fold(t))
        .collect()
}

/// Fraction of `mention_tokens` present in `label_tokens`.
///
/// Zero for an empty mention.
pub fn match_factor(mention_tokens: &[String], label_tokens: &[String]) -> f32 {
    if mention_tokens.is_empty() {
        return 0.0;
    }
    let label: HashSet<&str> = label_tokens.iter().map(String::as_str).collect();
    let found = mention_tokens
        .iter()
        .filter(|t| label.contains(t.as_str()))
        .count();
    found as f32 / mention_tokens.len() as f32
}

/// The label of `entity` with the highest match factor against the
/// mention. Only labels usable for `language` are considered; on equal
/// factors the earlier label wins.
pub fn best_label_match(
    entity: &Entity,
    mapping: &FieldMapping,
    language: Option<&str>,
    tokenizer: &dyn LabelTokenizer,
    mention_tokens: &[String],
) -> Option<LabelMatch> {
    let mut best: Option<LabelMatch> = None;
    for label in entity.labels_for(mapping, language) {
        let tokens = folded_tokens(tokenizer, &label.value, label.language.as_deref());
        let factor = match_factor(mention_tokens, &tokens);
        if best.as_ref().is_none_or(|b| factor > b.factor) {
            best = Some(LabelMatch {
                label: label.value.clone(),
                factor,
            });
        }
    }
    best
}

/// Deduplicate by entity id (highest score wins, at the position of the
/// first occurrence), sort by descending score keeping input order on ties,
/// and truncate to `max`.
pub fn rank(suggestions: Vec<Suggestion>, max: usize) -> Vec<Suggestion> {
    let mut ranked: Vec<Suggestion> = Vec::with_capacity(suggestions.len());
    for suggestion in suggestions {
        match ranked
            .iter_mut()
            .find(|s| s.entity_id == suggestion.entity_id)
        {
            Some(existing) if suggestion.score > existing.score => *existing = suggestion,
            Some(_) => {}
            None => ranked.push(suggestion),
        }
    }
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(max);
    ranked
}
