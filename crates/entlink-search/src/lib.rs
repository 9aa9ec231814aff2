//! Knowledge base side of entity linking.
//!
//! This crate defines what the linker needs from a knowledge base:
//!
//! - [`Entity`]: an entity whose fields are read through a [`FieldMapping`],
//!   so label, type and redirect fields can live under any name
//! - [`EntitySearcher`]: async label search plus lookup by id
//! - [`InMemorySearcher`]: token overlap search over entities held in
//!   memory, loadable from a JSON file
//!
//! # Usage
//!
//! ```
//! use entlink_search::{Entity, EntitySearcher, FieldMapping, InMemorySearcher, SearchQuery, RDFS_LABEL};
//!
//! # async fn example() -> entlink_search::Result<()> {
//! let searcher = InMemorySearcher::new(FieldMapping::default())
//!     .with_entities([Entity::new("NewZealand").with_text(RDFS_LABEL, "New Zealand", Some("en"))])?;
//!
//! let query = SearchQuery::new(RDFS_LABEL, "New Zealand").with_language(Some("en"));
//! let candidates = searcher.search(&query).await?;
//! assert_eq!(candidates[0].id(), "NewZealand");
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod memory;
pub mod searcher;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use entity::{
    language_matches, Entity, Field, FieldMapping, Text, RDFS_LABEL, RDFS_SEE_ALSO, RDF_TYPE,
};
pub use error::{Result, SearchError};
pub use memory::InMemorySearcher;
pub use searcher::{Candidate, EntitySearcher, SearchQuery, SharedSearcher};
