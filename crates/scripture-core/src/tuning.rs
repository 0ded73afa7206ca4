//! Tunable retrieval parameters, deserializable from the `retrieval`,
//! `fusion` and `bm25` config sections.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Per-call candidate counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalOptions {
    pub k_vector: usize,
    pub k_lexical: usize,
    pub top_final: usize,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self { k_vector: 24, k_lexical: 24, top_final: 8 }
    }
}

impl RetrievalOptions {
    pub fn validate(&self) -> Result<()> {
        if self.k_vector == 0 || self.k_lexical == 0 || self.top_final == 0 {
            return Err(Error::InvalidConfig(format!(
                "retrieval counts must be positive (k_vector={}, k_lexical={}, top_final={})",
                self.k_vector, self.k_lexical, self.top_final
            )));
        }
        Ok(())
    }
}

/// Score fusion and coverage constants. The defaults were picked
/// empirically and are not known to be optimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionParams {
    /// Scale applied to max-normalized lexical scores before the
    /// element-wise max with vector scores.
    pub lexical_weight: f32,
    pub min_results: usize,
    pub min_distinct_refs: usize,
    /// Cap on the merged list when the expanded second pass runs.
    pub max_merged: usize,
    pub expand_on_low_coverage: bool,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            lexical_weight: 0.9,
            min_results: 5,
            min_distinct_refs: 3,
            max_merged: 10,
            expand_on_low_coverage: true,
        }
    }
}

impl FusionParams {
    pub fn validate(&self) -> Result<()> {
        if !self.lexical_weight.is_finite() || self.lexical_weight < 0.0 {
            return Err(Error::InvalidConfig(format!("lexical_weight must be finite and >= 0, got {}", self.lexical_weight)));
        }
        if self.max_merged == 0 {
            return Err(Error::InvalidConfig("max_merged must be positive".to_string()));
        }
        Ok(())
    }
}

/// Okapi BM25 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

impl Bm25Params {
    pub fn validate(&self) -> Result<()> {
        if !(self.k1.is_finite() && self.k1 >= 0.0) || !(0.0..=1.0).contains(&self.b) {
            return Err(Error::InvalidConfig(format!("bm25 needs k1 >= 0 and 0 <= b <= 1 (k1={}, b={})", self.k1, self.b)));
        }
        Ok(())
    }
}
