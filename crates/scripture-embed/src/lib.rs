//! scripture-embed
//!
//! Decoding of the half-precision embedding blobs shipped with each shard,
//! and a deterministic hash embedder for running queries without a model.

pub mod half;
pub mod hash;

pub use half::{decode_half, decode_half_slice};
pub use hash::{get_default_embedder, HashEmbedder};
