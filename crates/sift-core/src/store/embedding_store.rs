use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Track;

use super::files::{self, DataFiles};
use super::matrix::EmbeddingMatrix;
use super::EMBEDDING_DIM;

/// Immutable catalog and phrase-bank embeddings with their metadata.
///
/// Row `i` of the catalog matrix belongs to `metadata()[i]`, and row `i`
/// of the phrase matrix belongs to `phrases()[i]`. Both pairings are
/// validated on construction. Rows are handed out as borrowed slices tied
/// to the store's lifetime.
#[derive(Debug)]
pub struct EmbeddingStore {
    catalog: EmbeddingMatrix,
    phrase_matrix: EmbeddingMatrix,
    tracks: Vec<Track>,
    phrases: Vec<String>,
    positions: HashMap<String, usize>,
}

impl EmbeddingStore {
    /// Assemble a store from already-loaded parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] when a metadata array does not match
    /// its matrix row count, and [`Error::DimensionMismatch`] when the two
    /// matrices disagree on row width.
    pub fn from_parts(
        catalog: EmbeddingMatrix,
        phrase_matrix: EmbeddingMatrix,
        tracks: Vec<Track>,
        phrases: Vec<String>,
    ) -> Result<Self> {
        if tracks.len() != catalog.rows() {
            return Err(Error::InvalidData(format!(
                "metadata has {} tracks but catalog matrix has {} rows",
                tracks.len(),
                catalog.rows()
            )));
        }
        if phrases.len() != phrase_matrix.rows() {
            return Err(Error::InvalidData(format!(
                "phrase list has {} entries but phrase matrix has {} rows",
                phrases.len(),
                phrase_matrix.rows()
            )));
        }
        if catalog.dim() != phrase_matrix.dim() {
            return Err(Error::DimensionMismatch {
                expected: catalog.dim(),
                actual: phrase_matrix.dim(),
            });
        }

        // First occurrence wins for duplicated ids.
        let mut positions = HashMap::with_capacity(tracks.len());
        for (i, track) in tracks.iter().enumerate() {
            positions.entry(track.seq_id.clone()).or_insert(i);
        }

        let off_unit = catalog.count_non_unit_rows() + phrase_matrix.count_non_unit_rows();
        if off_unit > 0 {
            log::warn!("{} stored embedding rows are not unit length", off_unit);
        }

        Ok(Self {
            catalog,
            phrase_matrix,
            tracks,
            phrases,
            positions,
        })
    }

    /// Load the standard data files from `dir` at the production dimension.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load(&DataFiles::in_dir(dir), EMBEDDING_DIM)
    }

    /// Load from explicit file paths with the given row width.
    pub fn load(files: &DataFiles, dim: usize) -> Result<Self> {
        log::info!("Loading catalog embeddings from {}", files.catalog_embeddings.display());
        let catalog = files::read_matrix(&files.catalog_embeddings, dim)?;
        let phrase_matrix = files::read_matrix(&files.phrase_embeddings, dim)?;
        let tracks: Vec<Track> = files::read_json(&files.metadata)?;
        let phrases: Vec<String> = files::read_json(&files.phrases)?;

        let store = Self::from_parts(catalog, phrase_matrix, tracks, phrases)?;
        log::info!(
            "Loaded {} tracks and {} phrases ({} dimensions)",
            store.len(),
            store.phrase_count(),
            store.dim()
        );
        Ok(store)
    }

    /// Write the store back out in the on-disk layout.
    pub fn save(&self, files: &DataFiles) -> Result<()> {
        files::write_matrix(&files.catalog_embeddings, &self.catalog)?;
        files::write_matrix(&files.phrase_embeddings, &self.phrase_matrix)?;
        std::fs::write(&files.metadata, serde_json::to_string_pretty(&self.tracks)?)?;
        std::fs::write(&files.phrases, serde_json::to_string_pretty(&self.phrases)?)?;
        Ok(())
    }

    /// The whole catalog matrix.
    #[must_use]
    pub const fn catalog_embeddings(&self) -> &EmbeddingMatrix {
        &self.catalog
    }

    /// The whole phrase-bank matrix.
    #[must_use]
    pub const fn phrase_embeddings(&self) -> &EmbeddingMatrix {
        &self.phrase_matrix
    }

    /// Embedding row of the track with `seq_id`.
    pub fn embedding_of(&self, seq_id: &str) -> Result<&[f32]> {
        self.position_of(seq_id)
            .and_then(|i| self.catalog.row(i))
            .ok_or_else(|| Error::NotFound {
                entity: "track",
                id: seq_id.to_string(),
            })
    }

    /// Embedding row of phrase `index`.
    pub fn phrase_embedding_of(&self, index: usize) -> Result<&[f32]> {
        self.phrase_matrix
            .row(index)
            .ok_or(Error::PhraseIndexOutOfRange {
                index,
                len: self.phrases.len(),
            })
    }

    /// Catalog tracks in matrix row order.
    #[must_use]
    pub fn metadata(&self) -> &[Track] {
        &self.tracks
    }

    /// Phrase-bank strings in matrix row order.
    #[must_use]
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Row index of `seq_id` in the catalog matrix.
    #[must_use]
    pub fn position_of(&self, seq_id: &str) -> Option<usize> {
        self.positions.get(seq_id).copied()
    }

    /// Number of catalog tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[must_use]
    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    #[must_use]
    pub const fn dim(&self) -> usize {
        self.catalog.dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_store() -> EmbeddingStore {
        let catalog = EmbeddingMatrix::from_rows(&[
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        let phrase_matrix =
            EmbeddingMatrix::from_rows(&[vec![0.6, 0.8, 0.0], vec![0.0, 0.6, 0.8]]).unwrap();
        let tracks = vec![
            Track::new("A", "sp-a", "Alpha", "Artist One"),
            Track::new("B", "sp-b", "Beta", "Artist Two"),
            Track::new("C", "sp-c", "Gamma", "Artist One; Artist Three"),
        ];
        let phrases = vec!["rainy night jazz".to_string(), "lofi chill beats".to_string()];

        EmbeddingStore::from_parts(catalog, phrase_matrix, tracks, phrases).unwrap()
    }

    #[test]
    fn test_embedding_of_known_id() {
        let store = sample_store();
        assert_eq!(store.embedding_of("B").unwrap(), &[0.0_f32, 1.0, 0.0]);
    }

    #[test]
    fn test_embedding_of_unknown_id() {
        let store = sample_store();
        let err = store.embedding_of("missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_embedding_is_a_view_into_the_matrix() {
        let store = sample_store();
        let row = store.embedding_of("C").unwrap();
        let matrix_row = store.catalog_embeddings().row(2).unwrap();
        assert!(std::ptr::eq(row, matrix_row));
    }

    #[test]
    fn test_phrase_embedding_bounds() {
        let store = sample_store();
        assert_eq!(store.phrase_embedding_of(1).unwrap(), &[0.0_f32, 0.6, 0.8]);

        let err = store.phrase_embedding_of(2).unwrap_err();
        assert!(matches!(err, Error::PhraseIndexOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_metadata_length_mismatch_rejected() {
        let catalog = EmbeddingMatrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
        let phrase_matrix = EmbeddingMatrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
        let err = EmbeddingStore::from_parts(
            catalog,
            phrase_matrix,
            Vec::new(),
            vec!["p".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_phrase_length_mismatch_rejected() {
        let catalog = EmbeddingMatrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
        let phrase_matrix = EmbeddingMatrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
        let err = EmbeddingStore::from_parts(
            catalog,
            phrase_matrix,
            vec![Track::new("A", "sp", "t", "a")],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_matrix_width_mismatch_rejected() {
        let catalog = EmbeddingMatrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
        let phrase_matrix = EmbeddingMatrix::from_rows(&[vec![1.0, 0.0, 0.0]]).unwrap();
        let err = EmbeddingStore::from_parts(
            catalog,
            phrase_matrix,
            vec![Track::new("A", "sp", "t", "a")],
            vec!["p".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn test_duplicate_seq_id_resolves_to_first_row() {
        let catalog = EmbeddingMatrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let phrase_matrix = EmbeddingMatrix::from_rows(&[vec![1.0, 0.0]]).unwrap();
        let store = EmbeddingStore::from_parts(
            catalog,
            phrase_matrix,
            vec![
                Track::new("A", "sp1", "t1", "a"),
                Track::new("A", "sp2", "t2", "a"),
            ],
            vec!["p".to_string()],
        )
        .unwrap();
        assert_eq!(store.position_of("A"), Some(0));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let files = DataFiles::in_dir(dir.path());
        let store = sample_store();
        store.save(&files).unwrap();

        let loaded = EmbeddingStore::load(&files, 3).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.phrases(), store.phrases());
        assert_eq!(loaded.embedding_of("A").unwrap(), &[1.0_f32, 0.0, 0.0]);
    }
}
