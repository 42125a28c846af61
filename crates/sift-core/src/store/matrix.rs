use std::slice::ChunksExact;

use crate::error::{Error, Result};
use crate::vector;

/// Number of bytes per f32 value.
const BYTES_PER_F32: usize = 4;

/// A dense row-major `f32` matrix with a fixed row width.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    data: Vec<f32>,
    dim: usize,
}

impl EmbeddingMatrix {
    /// Wrap a flat row-major buffer.
    ///
    /// The buffer length must be a whole number of `dim`-wide rows.
    pub fn new(data: Vec<f32>, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidData(
                "embedding dimension must be non-zero".to_string(),
            ));
        }
        if data.len() % dim != 0 {
            return Err(Error::InvalidData(format!(
                "{} values is not a whole number of {}-wide rows",
                data.len(),
                dim
            )));
        }
        Ok(Self { data, dim })
    }

    /// Decode raw little-endian `f32` bytes.
    pub fn from_le_bytes(bytes: &[u8], dim: usize) -> Result<Self> {
        if bytes.len() % BYTES_PER_F32 != 0 {
            return Err(Error::InvalidData(format!(
                "{} bytes is not a whole number of f32 values",
                bytes.len()
            )));
        }

        let data = bytes
            .chunks_exact(BYTES_PER_F32)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        Self::new(data, dim)
    }

    /// Build a matrix from individual rows, all of which must share a width.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(Error::InvalidData(
                "cannot infer dimension from zero rows".to_string(),
            ));
        };

        let dim = first.len();
        let mut data = Vec::with_capacity(dim * rows.len());
        for row in rows {
            if row.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Self::new(data, dim)
    }

    /// Encode as raw little-endian `f32` bytes (the on-disk format).
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.len() / self.dim
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow row `index`, or `None` past the end.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dim)?;
        let end = start.checked_add(self.dim)?;
        self.data.get(start..end)
    }

    /// Iterate rows in storage order.
    pub fn iter_rows(&self) -> ChunksExact<'_, f32> {
        self.data.chunks_exact(self.dim)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Number of rows whose norm is not within tolerance of 1.
    #[must_use]
    pub fn count_non_unit_rows(&self) -> usize {
        self.iter_rows().filter(|row| !vector::is_unit(row)).count()
    }
}
