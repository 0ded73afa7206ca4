//! Max-fusion of vector and lexical candidates.
//!
//! Vector scores are taken raw. Lexical scores are divided by the best lexical
//! score of the pass and scaled by a weight. A document keeps the larger of
//! its two values, so excelling on one signal is enough to rank.

use std::collections::HashMap;

use scripture_core::types::SourceKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusedHit {
    pub index: usize,
    pub score: f32,
    pub source: SourceKind,
}

/// Fuse both candidate lists. Output order is first-seen order (vector hits,
/// then lexical-only hits), which the stable sort in [`rank`] relies on for
/// deterministic ties.
pub fn fuse(vector: &[(usize, f32)], lexical: &[(usize, f32)], lexical_weight: f32) -> Vec<FusedHit> {
    let mut hits: Vec<FusedHit> = Vec::with_capacity(vector.len() + lexical.len());
    let mut position: HashMap<usize, usize> = HashMap::new();

    let mut offer = |index: usize, score: f32, source: SourceKind| match position.get(&index) {
        Some(&at) => {
            if score > hits[at].score {
                hits[at].score = score;
                hits[at].source = source;
            }
        }
        None => {
            position.insert(index, hits.len());
            hits.push(FusedHit { index, score, source });
        }
    };

    for &(index, score) in vector {
        offer(index, score, SourceKind::Vector);
    }

    let max = lexical.iter().map(|(_, s)| *s).fold(0.0f32, f32::max);
    let divisor = if max > 0.0 { max } else { 1.0 };
    for &(index, score) in lexical {
        offer(index, score / divisor * lexical_weight, SourceKind::Lexical);
    }

    hits
}

/// Highest fused score first, keeping first-seen order on ties; at most `top` hits.
pub fn rank(mut hits: Vec<FusedHit>, top: usize) -> Vec<FusedHit> {
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(top);
    hits
}
