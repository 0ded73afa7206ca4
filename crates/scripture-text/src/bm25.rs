//! In-memory Okapi BM25 over the corpus texts.
//!
//! ```text
//! score(q, d) = Σ idf(t) * f(t,d) * (k1 + 1) / (f(t,d) + k1 * (1 - b + b * |d| / avgdl))
//! idf(t)      = ln(1 + (N - df(t) + 0.5) / (df(t) + 0.5))
//! ```
//!
//! The index is built once and never updated; a changed document set means a
//! fresh index.

use std::collections::HashMap;

use scripture_core::tuning::Bm25Params;

/// Lower-case `s` and split it on runs of non-word characters. Word
/// characters are Unicode alphanumerics and `_`, so diacritics such as
/// `ātman` stay in one token.
pub fn tokenize(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
struct Bm25Doc {
    term_freqs: HashMap<String, u32>,
    len: usize,
}

#[derive(Debug, Clone)]
pub struct Bm25Index {
    docs: Vec<Bm25Doc>,
    doc_freqs: HashMap<String, usize>,
    avg_doc_len: f32,
    params: Bm25Params,
}

impl Bm25Index {
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_params(texts, Bm25Params::default())
    }

    pub fn with_params<I, S>(texts: I, params: Bm25Params) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut docs = Vec::new();
        let mut doc_freqs: HashMap<String, usize> = HashMap::new();
        let mut total_len = 0usize;
        for text in texts {
            let tokens = tokenize(text.as_ref());
            let mut term_freqs: HashMap<String, u32> = HashMap::new();
            for tok in &tokens {
                *term_freqs.entry(tok.clone()).or_insert(0) += 1;
            }
            for tok in term_freqs.keys() {
                *doc_freqs.entry(tok.clone()).or_insert(0) += 1;
            }
            total_len += tokens.len();
            docs.push(Bm25Doc { term_freqs, len: tokens.len() });
        }
        let avg_doc_len = if docs.is_empty() { 0.0 } else { total_len as f32 / docs.len() as f32 };
        Self { docs, doc_freqs, avg_doc_len, params }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn avg_doc_len(&self) -> f32 {
        self.avg_doc_len
    }

    pub fn doc_freq(&self, token: &str) -> usize {
        self.doc_freqs.get(token).copied().unwrap_or(0)
    }

    pub fn idf(&self, token: &str) -> f32 {
        let n = self.docs.len().max(1) as f32;
        let df = self.doc_freq(token) as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// One score per document, in document order. Documents without any
    /// query token score exactly 0.
    pub fn score(&self, query: &str) -> Vec<f32> {
        let terms = tokenize(query);
        let idfs: Vec<f32> = terms.iter().map(|t| self.idf(t)).collect();
        let Bm25Params { k1, b } = self.params;
        let avgdl = if self.avg_doc_len > 0.0 { self.avg_doc_len } else { 1.0 };
        self.docs
            .iter()
            .map(|doc| {
                let mut score = 0.0f32;
                for (term, idf) in terms.iter().zip(&idfs) {
                    let Some(&f) = doc.term_freqs.get(term) else { continue };
                    let f = f as f32;
                    let denom = f + k1 * (1.0 - b + b * (doc.len as f32 / avgdl));
                    let denom = if denom == 0.0 { 1.0 } else { denom };
                    score += idf * (f * (k1 + 1.0)) / denom;
                }
                score
            })
            .collect()
    }

    /// The `k` best documents as `(index, score)`, highest first. Ties keep
    /// document order; zero-score documents are still candidates.
    pub fn top_k(&self, query: &str, k: usize) -> Vec<(usize, f32)> {
        let mut ranked: Vec<(usize, f32)> = self.score(query).into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k.min(self.docs.len()));
        ranked
    }
}
