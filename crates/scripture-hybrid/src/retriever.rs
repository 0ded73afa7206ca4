use std::collections::HashSet;

use tracing::{debug, info};

use scripture_core::error::{Error, Result};
use scripture_core::traits::QueryEmbedder;
use scripture_core::tuning::{FusionParams, RetrievalOptions};
use scripture_core::types::ScoredChunk;
use scripture_text::expand;
use scripture_vector::top_k;

use crate::corpus::Corpus;
use crate::fusion::{fuse, rank};

/// Outcome of a retrieval call. No corpus is an expected state while shards
/// are loading, so it is a value rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    NotReady,
    Ready(Vec<ScoredChunk>),
}

impl Retrieval {
    pub fn chunks(&self) -> &[ScoredChunk] {
        match self {
            Retrieval::NotReady => &[],
            Retrieval::Ready(chunks) => chunks,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Retrieval::Ready(_))
    }
}

/// Two-pass hybrid retrieval: a fused vector + BM25 pass, then an expanded
/// second pass when the first one covers too few distinct passages.
#[derive(Debug, Clone, Default)]
pub struct HybridRetriever {
    params: FusionParams,
}

impl HybridRetriever {
    pub fn new(params: FusionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FusionParams {
        &self.params
    }

    pub async fn retrieve<E>(
        &self,
        query: &str,
        embedder: &E,
        corpus: Option<&Corpus>,
        options: &RetrievalOptions,
    ) -> Result<Retrieval>
    where
        E: QueryEmbedder + ?Sized,
    {
        let Some(corpus) = corpus else {
            debug!("no corpus published, skipping retrieval");
            return Ok(Retrieval::NotReady);
        };

        let first = self.retrieve_pass(query, embedder, corpus, options).await?;
        if !self.params.expand_on_low_coverage || !needs_expansion(&first, &self.params) {
            return Ok(Retrieval::Ready(first));
        }

        let expanded = expand(query);
        if expanded == query {
            return Ok(Retrieval::Ready(first));
        }
        info!(query, expanded = %expanded, results = first.len(), "low coverage, running expanded pass");
        let second = self.retrieve_pass(&expanded, embedder, corpus, options).await?;
        Ok(Retrieval::Ready(merge_passes(first, second, self.params.max_merged)))
    }

    /// One fused pass over the whole corpus.
    pub async fn retrieve_pass<E>(
        &self,
        query: &str,
        embedder: &E,
        corpus: &Corpus,
        options: &RetrievalOptions,
    ) -> Result<Vec<ScoredChunk>>
    where
        E: QueryEmbedder + ?Sized,
    {
        let query_vec = embedder.embed(query, corpus.dim()).await.map_err(Error::Embedding)?;
        if query_vec.len() != corpus.dim() {
            return Err(Error::DimensionMismatch { expected: corpus.dim(), actual: query_vec.len() });
        }

        let dense = top_k(&query_vec, corpus.embeddings(), corpus.dim(), options.k_vector)?;
        let lexical = corpus.lexical().top_k(query, options.k_lexical);
        let fused = rank(fuse(&dense, &lexical, self.params.lexical_weight), options.top_final);
        debug!(query, dense = dense.len(), lexical = lexical.len(), fused = fused.len(), "retrieval pass");

        Ok(fused
            .into_iter()
            .filter_map(|hit| {
                corpus.record(hit.index).map(|chunk| ScoredChunk {
                    chunk: chunk.clone(),
                    rank_index: hit.index,
                    score: hit.score,
                    source: hit.source,
                })
            })
            .collect())
    }
}

/// True when `results` are too few or span too few distinct references.
/// Records without any reference count together as one distinct value.
pub fn needs_expansion(results: &[ScoredChunk], params: &FusionParams) -> bool {
    let distinct: HashSet<Option<&str>> = results.iter().map(|r| r.chunk.reference()).collect();
    results.len() < params.min_results || distinct.len() < params.min_distinct_refs
}

/// First-pass results, then second-pass results, keeping the first occurrence
/// of each dedupe key, capped at `cap`.
pub fn merge_passes(first: Vec<ScoredChunk>, second: Vec<ScoredChunk>, cap: usize) -> Vec<ScoredChunk> {
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|r| seen.insert(r.chunk.dedupe_key()))
        .take(cap)
        .collect()
}
