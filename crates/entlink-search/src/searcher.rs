//! The search capability consumed by the linker.

use std::sync::Arc;

use async_trait::async_trait;

use crate::entity::{Entity, FieldMapping};
use crate::error::Result;

/// A label search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Concrete field to search, usually the mapping's label field.
    pub field: String,
    pub text: String,
    pub language: Option<String>,
    /// Maximum number of candidates to return.
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            text: text.into(),
            language: None,
            limit: 10,
        }
    }

    pub fn with_language(mut self, language: Option<&str>) -> Self {
        self.language = language.map(str::to_string);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// An entity returned for a query, with its relevance in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub entity: Arc<Entity>,
    pub base_score: f32,
}

impl Candidate {
    pub fn new(entity: Arc<Entity>, base_score: f32) -> Self {
        Self {
            entity,
            base_score: base_score.clamp(0.0, 1.0),
        }
    }

    pub fn id(&self) -> &str {
        &self.entity.id
    }
}

/// Looks up entities by label.
///
/// Implementations must be safe for concurrent use: the linker issues
/// several searches at once.
#[async_trait]
pub trait EntitySearcher: Send + Sync {
    /// Candidates ordered by relevance. No match is an empty vector.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>>;

    /// Fetch a single entity by id (used to dereference redirects).
    async fn get(&self, id: &str) -> Result<Option<Arc<Entity>>>;

    /// Field names used by the entities this searcher returns.
    fn field_mapping(&self) -> &FieldMapping;

    /// Get the name of this searcher.
    fn name(&self) -> &str;
}

/// A shared searcher that can be used across tasks.
pub type SharedSearcher = Arc<dyn EntitySearcher>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = SearchQuery::new("label", "Otago")
            .with_language(Some("en"))
            .with_limit(3);
        assert_eq!(query.language.as_deref(), Some("en"));
        assert_eq!(query.limit, 3);
    }

    #[test]
    fn test_candidate_score_clamped() {
        let entity = Arc::new(Entity::new("x"));
        assert_eq!(Candidate::new(entity.clone(), 1.7).base_score, 1.0);
        assert_eq!(Candidate::new(entity, -0.2).base_score, 0.0);
    }
}
