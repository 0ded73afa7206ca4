//! Shard cache and corpus publication.
//!
//! A selection loads whatever shards are missing, builds a complete new
//! [`Corpus`] off to the side and swaps it in atomically. Readers take an
//! `Arc` snapshot and never see a half-built corpus. Every selection gets a
//! generation number; a selection overtaken by a newer one drops its loaded
//! shards and publishes nothing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use futures::future::join_all;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument, warn};

use scripture_core::error::{Error, Result};
use scripture_core::traits::{QueryEmbedder, ShardSource};
use scripture_core::tuning::{Bm25Params, FusionParams, RetrievalOptions};
use scripture_core::types::{Chunk, Shard, ShardId};
use scripture_vector::load_shard;

use crate::corpus::Corpus;
use crate::retriever::{HybridRetriever, Retrieval};

/// What a call to [`CorpusStore::select`] did.
#[derive(Debug)]
pub enum Selection {
    /// A new corpus over `shards` is live.
    Published { shards: Vec<ShardId>, records: usize, failed: Vec<(ShardId, Error)> },
    /// None of the selected shards is available; no corpus is live.
    Cleared { failed: Vec<(ShardId, Error)> },
    /// A newer selection started while this one was loading.
    Superseded,
}

pub struct CorpusStore {
    source: Arc<dyn ShardSource>,
    cache: RwLock<HashMap<ShardId, Arc<Shard>>>,
    current: ArcSwapOption<Corpus>,
    generation: AtomicU64,
    publish: Mutex<()>,
    bm25: Bm25Params,
    retriever: HybridRetriever,
}

impl CorpusStore {
    pub fn new(source: Arc<dyn ShardSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
            current: ArcSwapOption::empty(),
            generation: AtomicU64::new(0),
            publish: Mutex::new(()),
            bm25: Bm25Params::default(),
            retriever: HybridRetriever::default(),
        }
    }

    pub fn with_bm25_params(mut self, params: Bm25Params) -> Self {
        self.bm25 = params;
        self
    }

    pub fn with_fusion_params(mut self, params: FusionParams) -> Self {
        self.retriever = HybridRetriever::new(params);
        self
    }

    /// Make `shard_ids` the live selection.
    ///
    /// Missing shards load concurrently; a shard that fails to load is
    /// reported in the outcome and left out, the others still publish. A
    /// build error leaves the previously published corpus in place.
    #[instrument(skip(self))]
    pub async fn select(&self, shard_ids: &[ShardId]) -> Result<Selection> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut wanted: Vec<&ShardId> = Vec::new();
        for id in shard_ids {
            if !wanted.contains(&id) {
                wanted.push(id);
            }
        }

        let missing: Vec<&ShardId> = {
            let cache = self.cache.read().await;
            wanted.iter().copied().filter(|id| !cache.contains_key(*id)).collect()
        };
        let source = self.source.as_ref();
        let loaded = join_all(missing.into_iter().map(|id| async move {
            (id.clone(), load_shard(source, id).await)
        }))
        .await;

        if self.is_stale(generation) {
            warn!(generation, "selection superseded, dropping loaded shards");
            return Ok(Selection::Superseded);
        }

        let mut failed = Vec::new();
        let picked: Vec<Arc<Shard>> = {
            let mut cache = self.cache.write().await;
            for (id, result) in loaded {
                match result {
                    Ok(shard) => {
                        cache.insert(id, Arc::new(shard));
                    }
                    Err(e) => {
                        warn!(shard = %id, error = %e, "failed to load shard");
                        failed.push((id, e));
                    }
                }
            }
            wanted.iter().filter_map(|id| cache.get(*id).cloned()).collect()
        };

        let next = if picked.is_empty() {
            None
        } else {
            Some(Arc::new(Corpus::build_with_params(picked.iter().map(|s| &**s), self.bm25)?))
        };

        let _guard = self.publish.lock().await;
        if self.is_stale(generation) {
            warn!(generation, "selection superseded before publish");
            return Ok(Selection::Superseded);
        }
        match next {
            Some(corpus) => {
                let shards = corpus.shards().to_vec();
                let records = corpus.len();
                info!(?shards, records, dim = corpus.dim(), "corpus published");
                self.current.store(Some(corpus));
                Ok(Selection::Published { shards, records, failed })
            }
            None => {
                info!("no shards available, corpus cleared");
                self.current.store(None);
                Ok(Selection::Cleared { failed })
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    /// The corpus live right now, if any. Holding the `Arc` pins that version.
    pub fn snapshot(&self) -> Option<Arc<Corpus>> {
        self.current.load_full()
    }

    pub async fn cached_shards(&self) -> Vec<ShardId> {
        let mut ids: Vec<ShardId> = self.cache.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Retrieve against one consistent snapshot of the live corpus.
    pub async fn retrieve<E>(&self, query: &str, embedder: &E, options: &RetrievalOptions) -> Result<Retrieval>
    where
        E: QueryEmbedder + ?Sized,
    {
        let snapshot = self.snapshot();
        self.retriever.retrieve(query, embedder, snapshot.as_deref(), options).await
    }

    /// Full passage lookup by canonical reference in the live corpus.
    pub fn find_passage(&self, reference: &str) -> Option<Chunk> {
        self.snapshot()?.find_by_ref(reference).cloned()
    }
}
