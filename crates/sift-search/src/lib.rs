//! Similarity search for sift.
//!
//! Turns a free-text prompt, a handful of seed tracks, or both into a
//! single unit-length query vector and ranks the whole catalog against it
//! by cosine similarity.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod distance;
pub mod engine;
pub mod phrase;
pub mod query;
pub mod rank;
pub mod tags;

pub use config::Config;
pub use engine::{SearchEngine, SearchOptions, SearchRequest, SearchResponse};
pub use phrase::{PhraseMatch, PhraseMatcher};
pub use query::{MatchSource, MatchedPhrase, QueryMode, QueryVector, QueryVectorBuilder};
pub use rank::{rank, SearchHit};
pub use tags::{KeywordTagExtractor, TagExtractor, TagMatch, TagMatcher, TAG_VOCABULARY};
