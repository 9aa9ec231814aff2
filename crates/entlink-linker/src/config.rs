//! Configuration for the entity linker.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LinkerError, Result};

/// Default number of suggestions kept per linked entity.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;

/// Default minimum fraction of mention tokens a label must contain.
pub const DEFAULT_MIN_MATCH_FACTOR: f32 = 0.5;

/// Default bound for a single search or entity lookup.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of searches in flight at once.
pub const DEFAULT_MAX_CONCURRENT_SEARCHES: usize = 4;

/// Searches always ask for at least this many candidates, leaving room for
/// the match factor and type filters to discard some.
pub const MIN_SEARCH_LIMIT: usize = 10;

/// What to do with candidates that redirect to another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectMode {
    /// Keep the candidate as returned.
    #[default]
    Ignore,
    /// Keep the candidate and add its redirect targets.
    Add,
    /// Replace the candidate by its single redirect target.
    Follow,
}

impl fmt::Display for RedirectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ignore => "ignore",
            Self::Add => "add",
            Self::Follow => "follow",
        };
        f.write_str(name)
    }
}

impl FromStr for RedirectMode {
    type Err = LinkerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "add" => Ok(Self::Add),
            "follow" => Ok(Self::Follow),
            other => Err(LinkerError::configuration(format!(
                "unknown redirect mode '{other}' (expected ignore, add or follow)"
            ))),
        }
    }
}

/// Configuration for [`EntityLinker`](crate::EntityLinker).
#[derive(Debug, Clone, PartialEq)]
pub struct EntityLinkerConfig {
    pub redirect_mode: RedirectMode,

    /// Suggestions kept per linked entity, at least 1.
    pub max_suggestions: usize,

    /// Candidates whose best label contains less than this fraction of the
    /// mention tokens are discarded. Within `(0, 1]`.
    pub min_match_factor: f32,

    /// When set, only entities with at least one of these types are
    /// suggested.
    pub type_constraints: Option<BTreeSet<String>>,

    /// Bound for each search and redirect lookup.
    pub search_timeout: Duration,

    /// Maximum number of searches in flight during one pass.
    pub max_concurrent_searches: usize,
}

impl Default for EntityLinkerConfig {
    fn default() -> Self {
        Self {
            redirect_mode: RedirectMode::default(),
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            min_match_factor: DEFAULT_MIN_MATCH_FACTOR,
            type_constraints: None,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            max_concurrent_searches: DEFAULT_MAX_CONCURRENT_SEARCHES,
        }
    }
}

impl EntityLinkerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_redirect_mode(mut self, mode: RedirectMode) -> Self {
        self.redirect_mode = mode;
        self
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    pub fn with_min_match_factor(mut self, factor: f32) -> Self {
        self.min_match_factor = factor;
        self
    }

    /// Restrict suggestions to entities of the given types.
    pub fn with_type_constraints<S: Into<String>>(
        mut self,
        types: impl IntoIterator<Item = S>,
    ) -> Self {
        self.type_constraints = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    pub fn with_max_concurrent_searches(mut self, max: usize) -> Self {
        self.max_concurrent_searches = max;
        self
    }

    /// Number of candidates requested per search.
    pub fn search_limit(&self) -> usize {
        self.max_suggestions.max(MIN_SEARCH_LIMIT)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_suggestions < 1 {
            return Err(LinkerError::configuration(
                "max_suggestions must be at least 1",
            ));
        }
        if !(self.min_match_factor > 0.0 && self.min_match_factor <= 1.0) {
            return Err(LinkerError::configuration(format!(
                "min_match_factor must be within (0,1], got {}",
                self.min_match_factor
            )));
        }
        if self.max_concurrent_searches < 1 {
            return Err(LinkerError::configuration(
                "max_concurrent_searches must be at least 1",
            ));
        }
        if self.search_timeout.is_zero() {
            return Err(LinkerError::configuration(
                "search_timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}
