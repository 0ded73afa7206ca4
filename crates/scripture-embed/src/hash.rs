use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use twox_hash::XxHash64;

use scripture_core::traits::QueryEmbedder;

/// Deterministic bag-of-tokens embedder: every lower-cased whitespace token
/// is hashed into one of `dim` buckets and the result is L2-normalized.
///
/// It carries no semantics; it exists so the vector path can run end to end
/// when no model is plugged in.
#[derive(Debug, Clone, Default)]
pub struct HashEmbedder {
    seed: u64,
}

impl HashEmbedder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn embed_sync(&self, text: &str, dim: usize) -> Vec<f32> {
        let mut v = vec![0f32; dim];
        if dim == 0 { return v; }
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(self.seed);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % dim as u64) as usize;
            let val = ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += val + (i % 3) as f32 * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

#[async_trait]
impl QueryEmbedder for HashEmbedder {
    async fn embed(&self, text: &str, dim: usize) -> anyhow::Result<Vec<f32>> {
        Ok(self.embed_sync(text, dim))
    }
}

pub fn get_default_embedder() -> Box<dyn QueryEmbedder> {
    let seed = std::env::var("APP_EMBED_SEED").ok().and_then(|v| v.parse().ok()).unwrap_or(0);
    Box::new(HashEmbedder::new(seed))
}
