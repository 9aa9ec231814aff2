//! In-memory knowledge base.
//!
//! Scores every label of every entity against the query by token overlap,
//! which is enough for tests, demos and small gazetteers. Larger knowledge
//! bases belong behind a real index that implements [`EntitySearcher`].

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use entlink_nlp::normalize::fold;
use entlink_nlp::{SharedTokenizer, SimpleTokenizer};
use tracing::{debug, info};

use crate::entity::{Entity, Field, FieldMapping, language_matches};
use crate::error::{Result, SearchError};
use crate::searcher::{Candidate, EntitySearcher, SearchQuery};

/// Entities held in memory, searched by token overlap.
///
/// The score of a label is `shared tokens / max(query tokens, label tokens)`
/// over case and diacritic folded tokens; an entity scores its best label.
/// Results are ordered by score, ties keep insertion order.
pub struct InMemorySearcher {
    mapping: FieldMapping,
    tokenizer: SharedTokenizer,
    entities: Vec<Arc<Entity>>,
    by_id: HashMap<String, usize>,
}

impl InMemorySearcher {
    /// Create an empty searcher using the [`SimpleTokenizer`].
    pub fn new(mapping: FieldMapping) -> Self {
        Self::with_tokenizer(mapping, Arc::new(SimpleTokenizer))
    }

    pub fn with_tokenizer(mapping: FieldMapping, tokenizer: SharedTokenizer) -> Self {
        Self {
            mapping,
            tokenizer,
            entities: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Add an entity. Fails if the id is already present.
    pub fn insert(&mut self, entity: Entity) -> Result<()> {
        if self.by_id.contains_key(&entity.id) {
            return Err(SearchError::knowledge_base(format!(
                "duplicate entity id '{}'",
                entity.id
            )));
        }
        self.by_id.insert(entity.id.clone(), self.entities.len());
        self.entities.push(Arc::new(entity));
        Ok(())
    }

    /// Builder variant of [`insert`](Self::insert).
    pub fn with_entities(mut self, entities: impl IntoIterator<Item = Entity>) -> Result<Self> {
        for entity in entities {
            self.insert(entity)?;
        }
        Ok(self)
    }

    /// Load a knowledge base from a JSON file containing an array of entities.
    pub fn load(
        path: impl AsRef<Path>,
        mapping: FieldMapping,
        tokenizer: SharedTokenizer,
    ) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let entities: Vec<Entity> = serde_json::from_str(&content)?;
        let searcher = Self::with_tokenizer(mapping, tokenizer).with_entities(entities)?;
        info!(
            path = %path.display(),
            entities = searcher.len(),
            "Loaded knowledge base"
        );
        Ok(searcher)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn folded_tokens(&self, text: &str, language: Option<&str>) -> BTreeSet<String> {
        self.tokenizer
            .tokenize(text, language)
            .iter()
            .map(|t| fold(t))
            .collect()
    }

    fn score_entity(
        &self,
        entity: &Entity,
        field: &Field,
        query_tokens: &BTreeSet<String>,
        language: Option<&str>,
    ) -> f32 {
        entity
            .texts(&self.mapping, field)
            .iter()
            .filter(|t| language_matches(t.language.as_deref(), language))
            .map(|t| {
                let label_tokens = self.folded_tokens(&t.value, t.language.as_deref());
                let shared = query_tokens.intersection(&label_tokens).count();
                let total = query_tokens.len().max(label_tokens.len());
                if total == 0 {
                    0.0
                } else {
                    shared as f32 / total as f32
                }
            })
            .fold(0.0, f32::max)
    }
}

#[async_trait]
impl EntitySearcher for InMemorySearcher {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>> {
        let language = query.language.as_deref();
        let query_tokens = self.folded_tokens(&query.text, language);
        if query_tokens.is_empty() {
            return Err(SearchError::invalid_query(format!(
                "no searchable tokens in '{}'",
                query.text
            )));
        }

        let field = Field::Other(query.field.clone());
        let mut scored: Vec<(f32, &Arc<Entity>)> = self
            .entities
            .iter()
            .map(|e| (self.score_entity(e, &field, &query_tokens, language), e))
            .filter(|(score, _)| *score > 0.0)
            .collect();
        // stable: equal scores keep insertion order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(query.limit);

        debug!(
            query = %query.text,
            results = scored.len(),
            "In-memory search"
        );
        Ok(scored
            .into_iter()
            .map(|(score, e)| Candidate::new(Arc::clone(e), score))
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Arc<Entity>>> {
        Ok(self.by_id.get(id).map(|&i| Arc::clone(&self.entities[i])))
    }

    fn field_mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::RDFS_LABEL;
    use std::io::Write;

    fn labelled(id: &str, label: &str) -> Entity {
        Entity::new(id).with_text(RDFS_LABEL, label, Some("en"))
    }

    fn otago() -> InMemorySearcher {
        InMemorySearcher::new(FieldMapping::default())
            .with_entities([
                labelled("UniversityOfOtago", "University of Otago"),
                labelled("UniversityOfOtago_Texas", "University of Otago (Texas)"),
                labelled("Otago", "Otago"),
            ])
            .unwrap()
    }

    fn query(text: &str) -> SearchQuery {
        SearchQuery::new(RDFS_LABEL, text).with_language(Some("en"))
    }

    fn ids(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.id()).collect()
    }

    #[tokio::test]
    async fn test_exact_label_scores_highest() {
        let results = otago().search(&query("University of Otago")).await.unwrap();
        assert_eq!(
            ids(&results),
            vec!["UniversityOfOtago", "UniversityOfOtago_Texas", "Otago"]
        );
        assert_eq!(results[0].base_score, 1.0);
        assert_eq!(results[1].base_score, 0.75);
    }

    #[tokio::test]
    async fn test_partial_query() {
        let results = otago().search(&query("otago")).await.unwrap();
        assert_eq!(results[0].id(), "Otago");
        assert!((results[1].base_score - 1.0 / 3.0).abs() < 1e-6);
        assert!((results[2].base_score - 0.25).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_limit_and_no_match() {
        let searcher = otago();
        assert_eq!(searcher.search(&query("Otago").with_limit(1)).await.unwrap().len(), 1);
        assert!(searcher.search(&query("Canterbury")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_language_filter() {
        let searcher = InMemorySearcher::new(FieldMapping::default())
            .with_entities([Entity::new("Geologe").with_text(RDFS_LABEL, "Geologe", Some("de"))])
            .unwrap();
        assert!(searcher.search(&query("Geologe")).await.unwrap().is_empty());
        let de = SearchQuery::new(RDFS_LABEL, "Geologe").with_language(Some("de"));
        assert_eq!(searcher.search(&de).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let err = otago().search(&query(" - ")).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_get() {
        let searcher = otago();
        assert!(searcher.get("Otago").await.unwrap().is_some());
        assert!(searcher.get("Dunedin").await.unwrap().is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = InMemorySearcher::new(FieldMapping::default())
            .with_entities([labelled("a", "A"), labelled("a", "B")]);
        assert!(matches!(result, Err(SearchError::KnowledgeBase(_))));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "NewZealand", "texts": {{"{RDFS_LABEL}": [{{"value": "New Zealand"}}]}}}}]"#
        )
        .unwrap();

        let searcher = InMemorySearcher::load(
            file.path(),
            FieldMapping::default(),
            Arc::new(SimpleTokenizer),
        )
        .unwrap();
        assert_eq!(searcher.len(), 1);
        let results = searcher.search(&query("Zealand")).await.unwrap();
        assert_eq!(results[0].base_score, 0.5);
    }

    #[test]
    fn test_load_missing_file() {
        let result = InMemorySearcher::load(
            "/nonexistent/kb.json",
            FieldMapping::default(),
            Arc::new(SimpleTokenizer),
        );
        assert!(matches!(result, Err(SearchError::Io(_))));
    }
}
