//! Read-only embedding store.
//!
//! Holds the catalog and phrase-bank matrices alongside their parallel
//! metadata arrays. Everything is loaded once and never mutated; callers
//! borrow rows as `&[f32]` views into the shared buffers.

pub mod embedding_store;
pub mod files;
pub mod lazy;
pub mod matrix;

pub use embedding_store::EmbeddingStore;
pub use files::DataFiles;
pub use lazy::LazyStore;
pub use matrix::EmbeddingMatrix;

/// Width of every embedding row in the on-disk data set.
pub const EMBEDDING_DIM: usize = 512;
