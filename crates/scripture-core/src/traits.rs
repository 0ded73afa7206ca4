use async_trait::async_trait;

use crate::error::Result;

/// Maps a query string to a vector of length `dim`.
///
/// The engine only relies on the output being deterministic enough that
/// repeated calls on the same text score comparably.
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    async fn embed(&self, text: &str, dim: usize) -> anyhow::Result<Vec<f32>>;
}

/// Where shard files come from: a directory tree, an object store, a test fixture.
#[async_trait]
pub trait ShardSource: Send + Sync {
    async fn fetch_text(&self, shard: &str, file: &str) -> Result<String>;
    async fn fetch_bytes(&self, shard: &str, file: &str) -> Result<Vec<u8>>;
}
