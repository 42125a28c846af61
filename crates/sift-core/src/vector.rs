//! Dense vector math over `f32` slices.
//!
//! Every vector the store hands out is L2-normalized, so [`dot`] of two
//! stored vectors is their cosine similarity. Operations that produce a new
//! query vector ([`normalize`], [`average`], [`blend`]) always return a
//! unit-length result or an error; they never emit NaN components.

use crate::error::{Error, Result};

/// Maximum deviation from 1.0 for a vector to count as unit length.
pub const NORM_TOLERANCE: f32 = 1e-3;

/// Dot product of two equal-length vectors.
pub fn dot(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Euclidean norm.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Whether `v` has norm within [`NORM_TOLERANCE`] of 1.
pub fn is_unit(v: &[f32]) -> bool {
    (l2_norm(v) - 1.0).abs() <= NORM_TOLERANCE
}

/// Scale `v` to unit length.
///
/// Fails with [`Error::DegenerateVector`] when the norm is zero or not
/// finite.
pub fn normalize(v: &[f32]) -> Result<Vec<f32>> {
    let norm = l2_norm(v);
    if norm == 0.0 || !norm.is_finite() {
        return Err(Error::DegenerateVector);
    }
    Ok(v.iter().map(|x| x / norm).collect())
}

/// Normalized element-wise mean of `vectors`.
pub fn average(vectors: &[&[f32]]) -> Result<Vec<f32>> {
    let Some(first) = vectors.first() else {
        return Err(Error::InvalidArgument(
            "cannot average an empty list of vectors".to_string(),
        ));
    };

    let dim = first.len();
    let mut sum = vec![0.0_f32; dim];
    for v in vectors {
        if v.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                actual: v.len(),
            });
        }
        for (acc, x) in sum.iter_mut().zip(v.iter()) {
            *acc += x;
        }
    }

    let count = vectors.len() as f32;
    for acc in &mut sum {
        *acc /= count;
    }

    normalize(&sum)
}

/// Normalized weighted sum `weight_a * a + weight_b * b`.
pub fn blend(a: &[f32], weight_a: f32, b: &[f32], weight_b: f32) -> Result<Vec<f32>> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mixed: Vec<f32> = a
        .iter()
        .zip(b)
        .map(|(x, y)| x * weight_a + y * weight_b)
        .collect();

    normalize(&mixed)
}
