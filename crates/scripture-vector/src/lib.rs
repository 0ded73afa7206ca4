//! scripture-vector
//!
//! Shard loading (manifest, JSONL records, half-precision embedding blob) and
//! brute-force dot-product search over the stacked corpus vectors.

pub mod search;
pub mod shard;
pub mod source;

pub use search::{dot, top_k};
pub use shard::{load_shard, MANIFEST_FILE};
pub use source::{FsShardSource, MemoryShardSource};
