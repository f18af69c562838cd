//! Location-safety search engine.
//!
//! Components, leaf first:
//!
//! - [`WorldQueryClient`] sends one predicate command and classifies the reply
//!   into a [`SafetyVerdict`].
//! - [`ChunkLoadManager`] force-loads a chunk at most once per search session.
//! - [`SafetyPredicateEvaluator`] runs the standing-check conjunction for one
//!   candidate, resolving `Unloaded` with a single load-and-retry.
//! - [`LocationSearchEngine`] samples candidates around the subject and returns
//!   the first safe one, or a definitive miss.
//!
//! [`lookup_position`] and [`teleport`] wrap the two subject commands the
//! trigger cycle needs around a search.
//!
//! Nothing here returns transport errors from a safety check: a failed or
//! empty reply is `Unsafe`, so a search always ends in a well-defined result.

mod chunks;
mod query;
mod safety;
mod search;
mod subject;

pub use chunks::{ChunkLoadManager, LoadOutcome};
pub use query::{NOT_LOADED_MARKER, PASSED_MARKER, WorldQueryClient, classify_response};
pub use safety::SafetyPredicateEvaluator;
pub use search::{
    LocationSearchEngine, OffsetSampler, RandomOffsets, SearchConfig, SearchConfigError,
    SearchError, SearchOutcome, SearchReport,
};
pub use subject::{lookup_position, parse_entity_position, teleport};

pub use subhop_types::{Position, SafetyVerdict};
