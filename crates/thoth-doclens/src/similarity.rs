//! Cosine similarity between embedding vectors.

use thoth_core::ThothError;

/// Compute the cosine similarity between two equal-length vectors.
///
/// Returns a value in `[-1, 1]`: the normalized dot product, measuring
/// directional closeness independent of magnitude. Accumulates in `f64` to
/// avoid drift on high-dimensional `f32` embeddings. When either vector has
/// zero magnitude the result is `0.0` — a degenerate embedding means "no
/// similarity", not a crash. Pure function; inputs are never mutated.
///
/// # Errors
///
/// Returns [`ThothError::DimensionMismatch`] when the vectors have different
/// lengths. This signals an inconsistency between the model that built the
/// index and the model that embedded the query; it is fatal, not recoverable.
///
/// # Examples
///
/// ```
/// use thoth_doclens::similarity::cosine_similarity;
///
/// let same = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap();
/// assert!((same - 1.0).abs() < 1e-9);
///
/// let orthogonal = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
/// assert!(orthogonal.abs() < 1e-9);
///
/// assert!(cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_err());
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, ThothError> {
    if a.len() != b.len() {
        return Err(ThothError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for i in 0..a.len() {
        let ai = a[i] as f64;
        let bi = b[i] as f64;
        dot += ai * bi;
        norm_a += ai * ai;
        norm_b += bi * bi;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / denom)
}
