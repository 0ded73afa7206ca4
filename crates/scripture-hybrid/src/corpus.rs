use scripture_core::error::{Error, Result};
use scripture_core::tuning::Bm25Params;
use scripture_core::types::{normalize_reference, Chunk, Shard, ShardId};
use scripture_text::Bm25Index;

/// The queryable union of the selected shards.
///
/// Records and vectors are concatenated in shard-selection order, so record
/// `i` owns `embeddings[i * dim..(i + 1) * dim]`. A corpus is never modified;
/// a new selection builds a new one.
#[derive(Debug)]
pub struct Corpus {
    records: Vec<Chunk>,
    embeddings: Vec<f32>,
    dim: usize,
    lexical: Bm25Index,
    shards: Vec<ShardId>,
}

impl Corpus {
    pub fn build<'a, I>(shards: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Shard>,
    {
        Self::build_with_params(shards, Bm25Params::default())
    }

    pub fn build_with_params<'a, I>(shards: I, params: Bm25Params) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Shard>,
    {
        let mut records = Vec::new();
        let mut embeddings = Vec::new();
        let mut names = Vec::new();
        let mut dim = None;
        for shard in shards {
            let expected = *dim.get_or_insert(shard.dim);
            if shard.dim != expected {
                return Err(Error::DimensionMismatch { expected, actual: shard.dim });
            }
            if shard.embeddings.len() != shard.records.len() * shard.dim {
                return Err(Error::DimensionMismatch {
                    expected: shard.records.len() * shard.dim,
                    actual: shard.embeddings.len(),
                });
            }
            records.extend(shard.records.iter().cloned());
            embeddings.extend_from_slice(&shard.embeddings);
            names.push(shard.name.clone());
        }
        if records.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let lexical = Bm25Index::with_params(records.iter().map(|r| r.text.as_str()), params);
        Ok(Self { records, embeddings, dim: dim.unwrap_or_default(), lexical, shards: names })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn records(&self) -> &[Chunk] {
        &self.records
    }

    pub fn record(&self, i: usize) -> Option<&Chunk> {
        self.records.get(i)
    }

    pub fn embeddings(&self) -> &[f32] {
        &self.embeddings
    }

    pub fn vector(&self, i: usize) -> Option<&[f32]> {
        self.embeddings.get(i * self.dim..(i + 1) * self.dim)
    }

    pub fn lexical(&self) -> &Bm25Index {
        &self.lexical
    }

    /// Shard names in selection order.
    pub fn shards(&self) -> &[ShardId] {
        &self.shards
    }

    /// First record whose resolved reference matches `reference` after
    /// normalization on both sides.
    pub fn find_by_ref(&self, reference: &str) -> Option<&Chunk> {
        let wanted = normalize_reference(reference);
        if wanted.is_empty() {
            return None;
        }
        self.records
            .iter()
            .find(|r| r.reference().is_some_and(|own| normalize_reference(own) == wanted))
    }
}
