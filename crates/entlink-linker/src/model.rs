//! Linking results.

use std::collections::HashMap;
use std::sync::Arc;

use entlink_nlp::Span;
use entlink_search::Entity;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::report::LinkingReport;

/// A ranked candidate entity for a linked surface text.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub entity_id: String,
    /// Read-only handle on the knowledge base entity.
    #[serde(skip)]
    pub entity: Arc<Entity>,
    /// `base score * match factor`, within `[0, 1]`.
    pub score: f32,
    /// The entity label that matched the mention.
    pub label: String,
    /// Id of the redirecting entity this suggestion was reached through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<String>,
}

impl Suggestion {
    pub fn new(entity: Arc<Entity>, score: f32, label: impl Into<String>) -> Self {
        Self {
            entity_id: entity.id.clone(),
            entity,
            score,
            label: label.into(),
            redirected_from: None,
        }
    }

    /// Mark this suggestion as reached through a redirect from `source`.
    pub fn via_redirect(mut self, source: impl Into<String>) -> Self {
        self.redirected_from = Some(source.into());
        self
    }
}

/// Suggestions compare by entity id and score.
impl PartialEq for Suggestion {
    fn eq(&self, other: &Self) -> bool {
        self.entity_id == other.entity_id && self.score == other.score
    }
}

/// All occurrences of one surface text with their shared suggestions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedEntity {
    pub selected_text: String,
    /// Occurrence spans in first-seen order, without duplicates.
    pub occurrences: Vec<Span>,
    /// Score of the top suggestion.
    pub score: f32,
    /// Ranked by descending score.
    pub suggestions: Vec<Suggestion>,
}

impl LinkedEntity {
    /// Create a linked entity from its first occurrence. Returns `None` when
    /// there is nothing to suggest.
    pub fn new(selected_text: impl Into<String>, span: Span, suggestions: Vec<Suggestion>) -> Option<Self> {
        let score = suggestions.first()?.score;
        Some(Self {
            selected_text: selected_text.into(),
            occurrences: vec![span],
            score,
            suggestions,
        })
    }

    /// Record another occurrence. Returns `false` if the span was known.
    pub fn add_occurrence(&mut self, span: Span) -> bool {
        if self.occurrences.contains(&span) {
            return false;
        }
        self.occurrences.push(span);
        true
    }

    /// Entity ids in rank order.
    pub fn suggestion_ids(&self) -> Vec<&str> {
        self.suggestions.iter().map(|s| s.entity_id.as_str()).collect()
    }

    pub fn top(&self) -> Option<&Suggestion> {
        self.suggestions.first()
    }
}

/// Output of a linking pass: linked entities keyed by surface text, in
/// order of first occurrence, plus the pass report.
#[derive(Debug, Clone, Default)]
pub struct LinkingResult {
    linked: Vec<LinkedEntity>,
    index: HashMap<String, usize>,
    pub report: LinkingReport,
}

impl LinkingResult {
    pub(crate) fn new(linked: Vec<LinkedEntity>, report: LinkingReport) -> Self {
        let index = linked
            .iter()
            .enumerate()
            .map(|(i, e)| (e.selected_text.clone(), i))
            .collect();
        Self {
            linked,
            index,
            report,
        }
    }

    /// Look up the linked entity for a surface text.
    pub fn get(&self, surface_text: &str) -> Option<&LinkedEntity> {
        self.index.get(surface_text).map(|&i| &self.linked[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkedEntity> {
        self.linked.iter()
    }

    /// Surface texts in order of first occurrence.
    pub fn surface_texts(&self) -> Vec<&str> {
        self.linked.iter().map(|e| e.selected_text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.linked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.linked.is_empty()
    }
}

/// Equality ignores the report.
impl PartialEq for LinkingResult {
    fn eq(&self, other: &Self) -> bool {
        self.linked == other.linked
    }
}

struct OrderedLinked<'a>(&'a [LinkedEntity]);

impl Serialize for OrderedLinked<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entity in self.0 {
            map.serialize_entry(&entity.selected_text, entity)?;
        }
        map.end()
    }
}

impl Serialize for LinkingResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LinkingResult", 2)?;
        state.serialize_field("linked", &OrderedLinked(&self.linked))?;
        state.serialize_field("report", &self.report)?;
        state.end()
    }
}
