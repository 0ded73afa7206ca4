//! scripture-hybrid
//!
//! Corpus assembly, score fusion and the two-pass hybrid retriever, plus the
//! store that caches shards and publishes corpus snapshots.

pub mod corpus;
pub mod fusion;
pub mod retriever;
pub mod store;

pub use corpus::Corpus;
pub use retriever::{merge_passes, needs_expansion, HybridRetriever, Retrieval};
pub use store::{CorpusStore, Selection};
