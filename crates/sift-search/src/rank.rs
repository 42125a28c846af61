//! Exhaustive cosine-similarity ranking over the catalog.

use std::collections::HashSet;

use serde::Serialize;
use sift_core::{vector, EmbeddingMatrix, Error, Result, Track};

/// A catalog track with its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    #[serde(flatten)]
    pub track: &'a Track,
    pub similarity: f32,
}

/// Dot product of `query` against every catalog row.
///
/// Both sides are unit length, so each score is a cosine similarity.
pub fn similarities(query: &[f32], catalog: &EmbeddingMatrix) -> Result<Vec<f32>> {
    if query.len() != catalog.dim() {
        return Err(Error::DimensionMismatch {
            expected: catalog.dim(),
            actual: query.len(),
        });
    }
    catalog.iter_rows().map(|row| vector::dot(query, row)).collect()
}

/// Rank `tracks` against `query`, best first.
///
/// Tracks whose `seq_id` is in `exclude` are dropped. Equal scores keep
/// catalog order. At most `limit` hits are returned.
pub fn rank<'a>(
    query: &[f32],
    catalog: &EmbeddingMatrix,
    tracks: &'a [Track],
    exclude: &HashSet<&str>,
    limit: usize,
) -> Result<Vec<SearchHit<'a>>> {
    if tracks.len() != catalog.rows() {
        return Err(Error::InvalidData(format!(
            "{} tracks for {} catalog rows",
            tracks.len(),
            catalog.rows()
        )));
    }

    let scores = similarities(query, catalog)?;

    let mut hits: Vec<SearchHit<'a>> = tracks
        .iter()
        .zip(scores)
        .filter(|(track, _)| !exclude.contains(track.seq_id.as_str()))
        .map(|(track, similarity)| SearchHit { track, similarity })
        .collect();

    // sort_by is stable.
    hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    hits.truncate(limit);
    Ok(hits)
}
