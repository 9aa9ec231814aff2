//! The entity linking pass.
//!
//! A pass over one document runs in three stages:
//!
//! 1. **Select**: mention candidates are picked from the annotated text by
//!    [`entlink_nlp::select`]. Invalid annotation spans become soft failures.
//! 2. **Resolve**: every distinct mention text is searched once. Candidates
//!    are scored (`base score * match factor`), filtered by the match factor
//!    floor and type constraints, redirect handled and ranked. Resolutions
//!    run concurrently, bounded by `max_concurrent_searches`.
//! 3. **Aggregate**: walking mentions in document order, each mention span
//!    is extended over neighbouring chunk tokens found in the top
//!    suggestion's label, and occurrences with the same normalized surface
//!    text are merged into one [`LinkedEntity`].
//!
//! Only stage 2 awaits; cancellation is checked around it so a cancelled
//! pass never exposes a partial result.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use entlink_nlp::normalize::normalize_surface;
use entlink_nlp::{
    select, AnalysedText, MentionCandidate, SharedTokenizer, Span, TextProcessingConfig,
};
use entlink_search::{Entity, SearchQuery, SharedSearcher};
use futures::stream::{self, StreamExt};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::{EntityLinkerConfig, RedirectMode};
use crate::error::{LinkerError, Result};
use crate::model::{LinkedEntity, LinkingResult, Suggestion};
use crate::report::{LinkingReport, SoftFailure};
use crate::scoring::{best_label_match, folded_tokens, rank};

/// Links mentions in annotated text to knowledge base entities.
///
/// Holds no per-document state: one linker can process any number of
/// documents, concurrently if needed.
pub struct EntityLinker {
    searcher: SharedSearcher,
    tokenizer: SharedTokenizer,
    text_config: TextProcessingConfig,
    config: EntityLinkerConfig,
}

/// Ranked suggestions for one distinct mention text.
#[derive(Default)]
struct Resolution {
    suggestions: Vec<Suggestion>,
    failures: Vec<SoftFailure>,
    /// False when the text had nothing to search for.
    searched: bool,
}

impl EntityLinker {
    /// Create a linker. Both configurations are validated here so that
    /// misconfiguration fails before any document is touched.
    pub fn new(
        searcher: SharedSearcher,
        tokenizer: SharedTokenizer,
        text_config: TextProcessingConfig,
        config: EntityLinkerConfig,
    ) -> Result<Self> {
        text_config.validate()?;
        config.validate()?;
        debug!(
            searcher = searcher.name(),
            tokenizer = tokenizer.name(),
            redirect_mode = %config.redirect_mode,
            max_suggestions = config.max_suggestions,
            "Entity linker created"
        );
        Ok(Self {
            searcher,
            tokenizer,
            text_config,
            config,
        })
    }

    /// Link the mentions of `text`, written in `language`.
    pub async fn process(
        &self,
        text: &AnalysedText,
        language: Option<&str>,
    ) -> Result<LinkingResult> {
        self.process_with_cancellation(text, language, CancellationToken::new())
            .await
    }

    /// Like [`process`](Self::process), but gives up with
    /// [`LinkerError::Cancelled`] as soon as `cancel` fires.
    pub async fn process_with_cancellation(
        &self,
        text: &AnalysedText,
        language: Option<&str>,
        cancel: CancellationToken,
    ) -> Result<LinkingResult> {
        if cancel.is_cancelled() {
            return Err(LinkerError::Cancelled);
        }

        let selection = select(text, &self.text_config);
        let mut report = LinkingReport {
            mentions_selected: selection.mentions.len(),
            ..Default::default()
        };
        report.failures.extend(
            selection
                .invalid_spans
                .iter()
                .map(|e| SoftFailure::InvalidSpan {
                    message: e.to_string(),
                }),
        );

        // Distinct mention texts in order of first occurrence
        let mut keys: HashMap<String, usize> = HashMap::new();
        let mut distinct: Vec<&MentionCandidate> = Vec::new();
        let mut mention_keys: Vec<usize> = Vec::with_capacity(selection.mentions.len());
        for mention in &selection.mentions {
            let key = normalize_surface(&mention.text, self.text_config.case_sensitive_matching);
            let index = *keys.entry(key).or_insert_with(|| {
                distinct.push(mention);
                distinct.len() - 1
            });
            mention_keys.push(index);
        }

        let resolutions = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Linking pass cancelled");
                return Err(LinkerError::Cancelled);
            }
            resolutions = self.resolve_all(&distinct, language) => resolutions,
        };

        for resolution in &resolutions {
            report.failures.extend(resolution.failures.iter().cloned());
        }
        report.distinct_searches = resolutions.iter().filter(|r| r.searched).count();

        let linked = self.aggregate(text, language, &selection.mentions, &mention_keys, &resolutions);
        report.linked_entities = linked.len();

        info!(
            mentions = report.mentions_selected,
            searches = report.distinct_searches,
            linked = report.linked_entities,
            failures = report.failures.len(),
            "Linking pass complete"
        );
        Ok(LinkingResult::new(linked, report))
    }

    /// Resolve all distinct mentions, results in input order.
    async fn resolve_all(
        &self,
        distinct: &[&MentionCandidate],
        language: Option<&str>,
    ) -> Vec<Resolution> {
        let mut resolved: Vec<(usize, Resolution)> = stream::iter(distinct.iter().enumerate())
            .map(|(i, mention)| async move { (i, self.resolve(mention, language).await) })
            .buffer_unordered(self.config.max_concurrent_searches)
            .collect()
            .await;
        resolved.sort_by_key(|(i, _)| *i);
        resolved.into_iter().map(|(_, r)| r).collect()
    }

    /// Search one mention text and rank its candidates.
    async fn resolve(&self, mention: &MentionCandidate, language: Option<&str>) -> Resolution {
        let mut resolution = Resolution::default();
        let mention_tokens = folded_tokens(self.tokenizer.as_ref(), &mention.text, language);
        if mention_tokens.is_empty() {
            debug!(mention = %mention.text, "Mention has no searchable tokens, skipped");
            return resolution;
        }
        resolution.searched = true;

        let mapping = self.searcher.field_mapping();
        let query = SearchQuery::new(mapping.label_field.clone(), mention.text.clone())
            .with_language(language)
            .with_limit(self.config.search_limit());

        let candidates = match timeout(self.config.search_timeout, self.searcher.search(&query)).await
        {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(e)) => {
                warn!(mention = %mention.text, error = %e, "Search failed, mention skipped");
                resolution.failures.push(SoftFailure::SearchUnavailable {
                    mention: mention.text.clone(),
                    message: e.to_string(),
                });
                return resolution;
            }
            Err(_) => {
                warn!(
                    mention = %mention.text,
                    timeout_ms = self.config.search_timeout.as_millis() as u64,
                    "Search timed out, mention skipped"
                );
                resolution.failures.push(SoftFailure::SearchTimeout {
                    mention: mention.text.clone(),
                    timeout_ms: self.config.search_timeout.as_millis() as u64,
                });
                return resolution;
            }
        };

        let mut suggestions = Vec::new();
        for candidate in candidates {
            let Some(found) = best_label_match(
                &candidate.entity,
                mapping,
                language,
                self.tokenizer.as_ref(),
                &mention_tokens,
            ) else {
                continue;
            };
            if found.factor < self.config.min_match_factor {
                trace!(
                    mention = %mention.text,
                    entity = candidate.id(),
                    factor = found.factor,
                    "Candidate below match factor floor"
                );
                continue;
            }
            let score = candidate.base_score * found.factor;
            let suggestion = Suggestion::new(Arc::clone(&candidate.entity), score, found.label);

            match self.config.redirect_mode {
                RedirectMode::Ignore => suggestions.push(suggestion),
                RedirectMode::Follow => {
                    let followed = self.follow(&candidate.entity, &mut resolution.failures).await;
                    suggestions.push(match followed {
                        Some(target) => Suggestion::new(target, score, suggestion.label)
                            .via_redirect(&candidate.entity.id),
                        None => suggestion,
                    });
                }
                RedirectMode::Add => {
                    suggestions.push(suggestion);
                    for target in self
                        .redirect_targets(&candidate.entity, &mut resolution.failures)
                        .await
                    {
                        let target_match = best_label_match(
                            &target,
                            mapping,
                            language,
                            self.tokenizer.as_ref(),
                            &mention_tokens,
                        );
                        if let Some(m) = target_match
                            && m.factor >= self.config.min_match_factor
                        {
                            suggestions.push(
                                Suggestion::new(target, score, m.label)
                                    .via_redirect(&candidate.entity.id),
                            );
                        }
                    }
                }
            }
        }

        if let Some(types) = &self.config.type_constraints {
            suggestions.retain(|s| s.entity.types(mapping).iter().any(|t| types.contains(t)));
        }
        resolution.suggestions = rank(suggestions, self.config.max_suggestions);
        debug!(
            mention = %mention.text,
            suggestions = resolution.suggestions.len(),
            "Mention resolved"
        );
        resolution
    }

    /// The single redirect target of `entity`, if it has exactly one and it
    /// can be fetched. One hop only.
    async fn follow(
        &self,
        entity: &Entity,
        failures: &mut Vec<SoftFailure>,
    ) -> Option<Arc<Entity>> {
        match entity.redirects(self.searcher.field_mapping()) {
            [target] => self.lookup(target, failures).await,
            _ => None,
        }
    }

    /// All fetchable redirect targets of `entity`.
    async fn redirect_targets(
        &self,
        entity: &Entity,
        failures: &mut Vec<SoftFailure>,
    ) -> Vec<Arc<Entity>> {
        let mut targets = Vec::new();
        for id in entity.redirects(self.searcher.field_mapping()) {
            if let Some(target) = self.lookup(id, failures).await {
                targets.push(target);
            }
        }
        targets
    }

    async fn lookup(&self, id: &str, failures: &mut Vec<SoftFailure>) -> Option<Arc<Entity>> {
        match timeout(self.config.search_timeout, self.searcher.get(id)).await {
            Ok(Ok(Some(entity))) => Some(entity),
            Ok(Ok(None)) => {
                debug!(entity = id, "Redirect target not in knowledge base");
                None
            }
            Ok(Err(e)) => {
                warn!(entity = id, error = %e, "Redirect lookup failed");
                failures.push(SoftFailure::LookupFailed {
                    entity_id: id.to_string(),
                    message: e.to_string(),
                });
                None
            }
            Err(_) => {
                warn!(entity = id, "Redirect lookup timed out");
                failures.push(SoftFailure::LookupFailed {
                    entity_id: id.to_string(),
                    message: format!(
                        "timed out after {}ms",
                        self.config.search_timeout.as_millis()
                    ),
                });
                None
            }
        }
    }

    /// Merge resolved mentions into linked entities, in document order.
    fn aggregate(
        &self,
        text: &AnalysedText,
        language: Option<&str>,
        mentions: &[MentionCandidate],
        mention_keys: &[usize],
        resolutions: &[Resolution],
    ) -> Vec<LinkedEntity> {
        let mut linked: Vec<LinkedEntity> = Vec::new();
        let mut by_surface: HashMap<String, usize> = HashMap::new();

        for (mention, &key) in mentions.iter().zip(mention_keys) {
            let suggestions = &resolutions[key].suggestions;
            let Some(top) = suggestions.first() else {
                continue;
            };
            let label_tokens: HashSet<String> =
                folded_tokens(self.tokenizer.as_ref(), &top.label, language)
                    .into_iter()
                    .collect();
            let span = self.extend(mention, &label_tokens, language);
            let Some(surface) = text.slice(&span) else {
                continue;
            };
            let surface_key = normalize_surface(surface, self.text_config.case_sensitive_matching);

            match by_surface.get(&surface_key) {
                Some(&i) => {
                    linked[i].add_occurrence(span);
                }
                None => {
                    if let Some(entity) = LinkedEntity::new(surface, span, suggestions.clone()) {
                        by_surface.insert(surface_key, linked.len());
                        linked.push(entity);
                    }
                }
            }
        }
        linked
    }

    /// Grow the mention over adjacent context tokens that occur in the
    /// matched label.
    fn extend(
        &self,
        mention: &MentionCandidate,
        label_tokens: &HashSet<String>,
        language: Option<&str>,
    ) -> Span {
        let in_label = |index: usize| {
            let tokens = folded_tokens(
                self.tokenizer.as_ref(),
                &mention.context[index].text,
                language,
            );
            !tokens.is_empty() && tokens.iter().all(|t| label_tokens.contains(t))
        };

        let mut from = mention.context_offset;
        while from > 0 && in_label(from - 1) {
            from -= 1;
        }
        let mut to = mention.context_end();
        while to < mention.context.len() && in_label(to) {
            to += 1;
        }
        if from == mention.context_offset && to == mention.context_end() {
            return mention.span;
        }
        Span::new(mention.context[from].span.start, mention.context[to - 1].span.end)
    }
}
