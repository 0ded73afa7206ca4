#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use scripture_core::traits::QueryEmbedder;
use scripture_core::types::{Chunk, Shard};
use scripture_vector::MemoryShardSource;

/// Returns the same vector for every query and counts calls.
pub struct FixedEmbedder {
    pub vector: Vec<f32>,
    pub calls: AtomicUsize,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryEmbedder for FixedEmbedder {
    async fn embed(&self, _text: &str, _dim: usize) -> anyhow::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vector.clone())
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl QueryEmbedder for FailingEmbedder {
    async fn embed(&self, _text: &str, _dim: usize) -> anyhow::Result<Vec<f32>> {
        anyhow::bail!("model offline")
    }
}

pub fn chunk(text: &str, reference: Option<&str>) -> Chunk {
    let mut c = Chunk::new(text);
    c.canonical_ref = reference.map(str::to_string);
    c
}

pub fn shard(name: &str, dim: usize, records: Vec<Chunk>, embeddings: Vec<f32>) -> Shard {
    let records = records
        .into_iter()
        .map(|mut r| {
            r.shard = Some(name.to_string());
            r
        })
        .collect();
    Shard { name: name.to_string(), records, embeddings, dim }
}

/// Register a shard's three files with `source`; vectors go through half encoding.
pub fn add_shard_files(source: &mut MemoryShardSource, name: &str, dim: usize, texts: &[&str], vectors: &[f32]) {
    let manifest = json!({"dim": dim, "combined_chunks": "chunks.jsonl", "embeddings_bin": "embeddings.f16.bin", "count": texts.len()});
    let records: String = texts
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}\n", json!({"text": t, "canonical_ref": format!("{name} {i}")})))
        .collect();
    let blob: Vec<u8> = vectors.iter().flat_map(|v| half::f16::from_f32(*v).to_bits().to_le_bytes()).collect();
    source.insert(name, "manifest.json", manifest.to_string());
    source.insert(name, "chunks.jsonl", records);
    source.insert(name, "embeddings.f16.bin", blob);
}
