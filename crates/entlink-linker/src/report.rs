//! Report types for linking pass diagnostics.

use std::fmt;

use serde::Serialize;

/// A per-mention problem that was recovered from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SoftFailure {
    /// The searcher returned an error; the mention got no candidates.
    SearchUnavailable { mention: String, message: String },
    /// The search did not answer in time; the mention got no candidates.
    SearchTimeout { mention: String, timeout_ms: u64 },
    /// A redirect target could not be fetched; the redirecting entity was
    /// kept instead.
    LookupFailed { entity_id: String, message: String },
    /// An annotation had an invalid span and was skipped.
    InvalidSpan { message: String },
}

impl fmt::Display for SoftFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SearchUnavailable { mention, message } => {
                write!(f, "search for '{mention}' failed: {message}")
            }
            Self::SearchTimeout {
                mention,
                timeout_ms,
            } => write!(f, "search for '{mention}' timed out after {timeout_ms}ms"),
            Self::LookupFailed { entity_id, message } => {
                write!(f, "lookup of '{entity_id}' failed: {message}")
            }
            Self::InvalidSpan { message } => write!(f, "skipped annotation: {message}"),
        }
    }
}

/// Report summarizing a linking pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkingReport {
    /// Number of mention candidates selected from the text.
    pub mentions_selected: usize,
    /// Number of searches issued (one per distinct mention text).
    pub distinct_searches: usize,
    /// Number of surface texts in the result.
    pub linked_entities: usize,
    /// Recovered failures, in document order.
    pub failures: Vec<SoftFailure>,
}

impl LinkingReport {
    /// Whether any failures were recovered from.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl fmt::Display for LinkingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LinkingReport {{ mentions: {}, searches: {}, linked: {}, failures: {} }}",
            self.mentions_selected,
            self.distinct_searches,
            self.linked_entities,
            self.failures.len(),
        )
    }
}
