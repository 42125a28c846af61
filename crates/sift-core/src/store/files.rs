//! On-disk layout of the sift data set.
//!
//! The data directory holds two raw matrices and two JSON arrays, all
//! produced offline:
//!
//! ```text
//! data/
//!   embeddings.bin               catalog matrix, f32 LE, row-major
//!   embeddings.meta.json         optional {"shape": [rows, dim], "dtype": "float32"}
//!   metadata.json                [Track, ...] in matrix row order
//!   phrase_embeddings.bin        phrase-bank matrix, same format
//!   phrase_embeddings.meta.json  optional shape sidecar
//!   phrases.json                 ["rainy night jazz", ...] in matrix row order
//! ```

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::matrix::EmbeddingMatrix;

const CATALOG_EMBEDDINGS: &str = "embeddings.bin";
const PHRASE_EMBEDDINGS: &str = "phrase_embeddings.bin";
const METADATA: &str = "metadata.json";
const PHRASES: &str = "phrases.json";

/// Paths of the four files backing an [`EmbeddingStore`](super::EmbeddingStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub catalog_embeddings: PathBuf,
    pub phrase_embeddings: PathBuf,
    pub metadata: PathBuf,
    pub phrases: PathBuf,
}

impl DataFiles {
    /// The standard file names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            catalog_embeddings: dir.join(CATALOG_EMBEDDINGS),
            phrase_embeddings: dir.join(PHRASE_EMBEDDINGS),
            metadata: dir.join(METADATA),
            phrases: dir.join(PHRASES),
        }
    }

    /// Files that do not exist on disk.
    #[must_use]
    pub fn missing(&self) -> Vec<&Path> {
        [
            &self.catalog_embeddings,
            &self.phrase_embeddings,
            &self.metadata,
            &self.phrases,
        ]
        .into_iter()
        .map(PathBuf::as_path)
        .filter(|p| !p.exists())
        .collect()
    }
}

/// Shape sidecar written next to a matrix file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixShape {
    pub shape: [usize; 2],
    pub dtype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl MatrixShape {
    #[must_use]
    pub fn of(matrix: &EmbeddingMatrix) -> Self {
        Self {
            shape: [matrix.rows(), matrix.dim()],
            dtype: "float32".to_string(),
            size_bytes: Some((matrix.as_slice().len() * 4) as u64),
        }
    }
}

/// Sidecar path for a matrix file: `embeddings.bin` -> `embeddings.meta.json`.
#[must_use]
pub fn sidecar_path(matrix_path: &Path) -> PathBuf {
    matrix_path.with_extension("meta.json")
}

/// Read a raw f32 matrix, checking it against its sidecar when one exists.
pub fn read_matrix(path: &Path, dim: usize) -> Result<EmbeddingMatrix> {
    let bytes = std::fs::read(path)?;
    let matrix = EmbeddingMatrix::from_le_bytes(&bytes, dim).map_err(|e| match e {
        Error::InvalidData(msg) => Error::InvalidData(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;

    let sidecar = sidecar_path(path);
    if sidecar.exists() {
        let declared: MatrixShape = read_json(&sidecar)?;
        if declared.dtype != "float32" {
            return Err(Error::InvalidData(format!(
                "{}: unsupported dtype {}",
                sidecar.display(),
                declared.dtype
            )));
        }
        if declared.shape != [matrix.rows(), matrix.dim()] {
            return Err(Error::InvalidData(format!(
                "{}: declared shape {:?} but file holds [{}, {}]",
                sidecar.display(),
                declared.shape,
                matrix.rows(),
                matrix.dim()
            )));
        }
    }

    Ok(matrix)
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write a matrix and its shape sidecar.
pub fn write_matrix(path: &Path, matrix: &EmbeddingMatrix) -> Result<()> {
    std::fs::write(path, matrix.to_le_bytes())?;
    let sidecar = serde_json::to_string_pretty(&MatrixShape::of(matrix))?;
    std::fs::write(sidecar_path(path), sidecar)?;
    Ok(())
}
