//! Searcher wrapper with injectable failures and latency, for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::entity::{Entity, FieldMapping};
use crate::error::{Result, SearchError};
use crate::searcher::{Candidate, EntitySearcher, SearchQuery, SharedSearcher};

/// Wraps a searcher, recording every query and failing or stalling the
/// ones it was told to.
pub struct FlakySearcher {
    inner: SharedSearcher,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    failing_lookups: HashSet<String>,
    queries: Mutex<Vec<String>>,
}

impl FlakySearcher {
    pub fn new(inner: SharedSearcher) -> Self {
        Self {
            inner,
            failing: HashSet::new(),
            delays: HashMap::new(),
            failing_lookups: HashSet::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Searches for `text` fail with [`SearchError::Unavailable`].
    pub fn fail_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_lowercase());
        self
    }

    /// Searches for `text` sleep before answering.
    pub fn delay_on(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_lowercase(), delay);
        self
    }

    /// Lookups of entity `id` fail with [`SearchError::Unavailable`].
    pub fn fail_get(mut self, id: &str) -> Self {
        self.failing_lookups.insert(id.to_string());
        self
    }

    /// Query texts received so far, in arrival order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl EntitySearcher for FlakySearcher {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>> {
        self.queries.lock().push(query.text.clone());
        let key = query.text.to_lowercase();
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&key) {
            return Err(SearchError::unavailable(format!(
                "injected failure for '{}'",
                query.text
            )));
        }
        self.inner.search(query).await
    }

    async fn get(&self, id: &str) -> Result<Option<Arc<Entity>>> {
        if self.failing_lookups.contains(id) {
            return Err(SearchError::unavailable(format!("injected failure for '{id}'")));
        }
        self.inner.get(id).await
    }

    fn field_mapping(&self) -> &FieldMapping {
        self.inner.field_mapping()
    }

    fn name(&self) -> &str {
        "flaky"
    }
}
