//! Domain types shared by the shard loader, the scorers and the retriever.

use serde::{Deserialize, Serialize};

pub type ShardId = String;

/// One retrievable passage plus its bibliographic metadata.
///
/// - `text`: the passage itself, the only required field
/// - `work`/`collection`/`translator`/`source`: bibliographic context
/// - `canonical_ref`/`canon_id`/`id`: optional identifiers, see [`resolve_reference`]
/// - `shard`: assigned by the loader, never read from record data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canon_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub shard: Option<ShardId>,
}

impl Chunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn reference(&self) -> Option<&str> {
        resolve_reference(self)
    }

    /// Key used when merging result lists: the resolved reference, or
    /// `work:` followed by the first 20 characters of the text.
    pub fn dedupe_key(&self) -> String {
        match self.reference() {
            Some(r) => r.to_string(),
            None => {
                let prefix: String = self.text.chars().take(20).collect();
                format!("{}:{}", self.work.as_deref().unwrap_or_default(), prefix)
            }
        }
    }
}

/// Resolve the best identifier of a chunk.
///
/// Fields are tried in the order `canonical_ref`, `canon_id`, `id`; blank
/// values are skipped and the winner is returned trimmed.
pub fn resolve_reference(chunk: &Chunk) -> Option<&str> {
    [&chunk.canonical_ref, &chunk.canon_id, &chunk.id]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Normalize a reference for tolerant matching: bracketed segments such as
/// `[Bhagavad Gita]` are dropped, en/em dashes become `-` and whitespace runs
/// collapse to one space.
pub fn normalize_reference(reference: &str) -> String {
    let mut stripped = String::with_capacity(reference.len());
    let mut rest = reference;
    while let Some(open) = rest.find('[') {
        match rest[open..].find(']') {
            Some(close) => {
                stripped.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    stripped.push_str(rest);
    let dashed: String = stripped
        .chars()
        .map(|c| if c == '\u{2013}' || c == '\u{2014}' { '-' } else { c })
        .collect();
    dashed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Per-shard metadata read from `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub dim: usize,
    pub combined_chunks: String,
    pub embeddings_bin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// A loaded shard. `embeddings` holds `records.len() * dim` values, record
/// `i` owning the slice `[i * dim, (i + 1) * dim)`.
#[derive(Debug, Clone)]
pub struct Shard {
    pub name: ShardId,
    pub records: Vec<Chunk>,
    pub embeddings: Vec<f32>,
    pub dim: usize,
}

impl Shard {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn vector(&self, i: usize) -> Option<&[f32]> {
        self.embeddings.get(i * self.dim..(i + 1) * self.dim)
    }
}

/// Indicates which signal produced a fused score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Vector,
    Lexical,
}

/// A chunk returned from a retrieval call.
///
/// `rank_index` is the chunk's position in the corpus it was retrieved from
/// and `score` its fused score. Neither is part of persisted data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    #[serde(flatten)]
    pub chunk: Chunk,
    pub rank_index: usize,
    pub score: f32,
    pub source: SourceKind,
}

impl ScoredChunk {
    /// First `max_chars` characters of the text, with `…` appended when cut.
    pub fn snippet(&self, max_chars: usize) -> String {
        let mut chars = self.chunk.text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() { format!("{head}…") } else { head }
    }
}

/// The `{id, text, work}` triple handed to answer generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextPassage {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<String>,
}

impl From<&Chunk> for ContextPassage {
    fn from(chunk: &Chunk) -> Self {
        Self {
            id: chunk.reference().unwrap_or("?").to_string(),
            text: chunk.text.clone(),
            work: chunk.work.clone(),
        }
    }
}

impl From<&ScoredChunk> for ContextPassage {
    fn from(scored: &ScoredChunk) -> Self {
        Self::from(&scored.chunk)
    }
}
