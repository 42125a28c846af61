use std::sync::{Mutex, OnceLock, PoisonError};

use crate::error::Result;

use super::embedding_store::EmbeddingStore;
use super::files::DataFiles;

/// An [`EmbeddingStore`] that is loaded on first access.
///
/// Concurrent first callers serialize on an init lock so the files are
/// read exactly once; afterwards every caller gets the same snapshot
/// without locking. A failed load is not cached, so the next call retries.
#[derive(Debug)]
pub struct LazyStore {
    files: DataFiles,
    dim: usize,
    // OnceLock::get_or_try_init is unstable, so fallible init goes
    // through this lock.
    init: Mutex<()>,
    store: OnceLock<EmbeddingStore>,
}

impl LazyStore {
    #[must_use]
    pub fn new(files: DataFiles, dim: usize) -> Self {
        Self {
            files,
            dim,
            init: Mutex::new(()),
            store: OnceLock::new(),
        }
    }

    /// The loaded store, loading it if this is the first access.
    pub fn get(&self) -> Result<&EmbeddingStore> {
        if let Some(store) = self.store.get() {
            return Ok(store);
        }

        // The lock guards no data, so a panic elsewhere leaves nothing to repair.
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(store) = self.store.get() {
            return Ok(store);
        }

        let loaded = EmbeddingStore::load(&self.files, self.dim)?;
        Ok(self.store.get_or_init(|| loaded))
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.store.get().is_some()
    }

    #[must_use]
    pub const fn files(&self) -> &DataFiles {
        &self.files
    }
}
