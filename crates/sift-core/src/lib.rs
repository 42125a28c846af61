//! Core domain model for sift.
//!
//! This crate defines the catalog model (`Track`, `TagScore`), the error
//! taxonomy shared by every sift crate, unit-vector math, and the
//! read-only embedding store that backs similarity search.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod store;
pub mod vector;

pub use error::{Error, Result};
pub use model::{TagScore, Track};
pub use store::{DataFiles, EmbeddingMatrix, EmbeddingStore, LazyStore, EMBEDDING_DIM};
