//! Entity linking for annotated text.
//!
//! Given a document annotated with sentences, chunks and part-of-speech
//! tags, the [`EntityLinker`] picks the mentions worth resolving, searches a
//! knowledge base for each distinct mention text, scores and ranks the
//! candidates, optionally resolves redirects, and merges repeated mentions
//! into one [`LinkedEntity`] per surface text.
//!
//! # Scoring
//!
//! A candidate's score is `base score * match factor`, where the base score
//! comes from the searcher and the match factor is the fraction of mention
//! tokens found in the candidate's best label. Candidates under
//! `min_match_factor` are discarded; equal scores keep searcher order.
//!
//! # Failures
//!
//! Only misconfiguration and cancellation are errors. Search failures,
//! timeouts and invalid annotation spans are recovered per mention and
//! listed in the [`LinkingReport`].
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use entlink_linker::{EntityLinker, EntityLinkerConfig, RedirectMode};
//! use entlink_nlp::{AnalysedText, SimpleTokenizer, TextProcessingConfig};
//! use entlink_search::{FieldMapping, InMemorySearcher};
//!
//! # async fn example(document: AnalysedText) -> Result<(), Box<dyn std::error::Error>> {
//! let searcher = InMemorySearcher::load(
//!     "kb.json",
//!     FieldMapping::default(),
//!     Arc::new(SimpleTokenizer),
//! )?;
//! let linker = EntityLinker::new(
//!     Arc::new(searcher),
//!     Arc::new(SimpleTokenizer),
//!     TextProcessingConfig::default(),
//!     EntityLinkerConfig::default().with_redirect_mode(RedirectMode::Follow),
//! )?;
//!
//! let result = linker.process(&document, Some("en")).await?;
//! for linked in result.iter() {
//!     println!("{} -> {:?}", linked.selected_text, linked.suggestion_ids());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod linker;
pub mod model;
pub mod report;
pub mod scoring;

pub use config::{
    EntityLinkerConfig, RedirectMode, DEFAULT_MAX_CONCURRENT_SEARCHES, DEFAULT_MAX_SUGGESTIONS,
    DEFAULT_MIN_MATCH_FACTOR, DEFAULT_SEARCH_TIMEOUT, MIN_SEARCH_LIMIT,
};
pub use error::{LinkerError, Result};
pub use linker::EntityLinker;
pub use model::{LinkedEntity, LinkingResult, Suggestion};
pub use report::{LinkingReport, SoftFailure};
pub use tokio_util::sync::CancellationToken;
