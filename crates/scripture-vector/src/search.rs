use scripture_core::error::{Error, Result};

/// Dot product where a NaN product contributes 0 and a non-finite total
/// scores 0. Never returns `-0.0`.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    let sum: f32 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let p = x * y;
            if p.is_nan() { 0.0 } else { p }
        })
        .sum();
    // -0.0 folds into 0.0 so equal scores tie by index under total_cmp
    if sum == 0.0 || !sum.is_finite() { 0.0 } else { sum }
}

/// Score `query` against every `dim`-long slice of `block` and return the `k`
/// best as `(index, score)`, highest first, ties broken by lower index.
///
/// Vectors are expected to be L2-normalized upstream, which makes the dot
/// product a cosine similarity; nothing here enforces it.
pub fn top_k(query: &[f32], block: &[f32], dim: usize, k: usize) -> Result<Vec<(usize, f32)>> {
    if dim == 0 || query.len() != dim {
        return Err(Error::DimensionMismatch { expected: dim, actual: query.len() });
    }
    if block.len() % dim != 0 {
        return Err(Error::parse(
            "vector block",
            format!("{} values is not a multiple of dim {dim}", block.len()),
        ));
    }
    let mut scored: Vec<(usize, f32)> = block
        .chunks_exact(dim)
        .map(|doc| dot(query, doc))
        .enumerate()
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(k);
    Ok(scored)
}
