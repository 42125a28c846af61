//! Query vector construction.
//!
//! | prompt | seeds | query vector                                   |
//! |--------|-------|------------------------------------------------|
//! | yes    | no    | phrase vector                                  |
//! | no     | yes   | normalize(mean(seed vectors))                  |
//! | yes    | yes   | normalize(0.7 * seed average + 0.3 * phrase)   |
//! | no     | no    | `InvalidArgument`                              |

use std::borrow::Cow;

use serde::Serialize;
use sift_core::{vector, EmbeddingStore, Error, Result};

use crate::phrase::PhraseMatcher;
use crate::tags::{filter_to_vocabulary, TagMatcher};

/// Weight of the seed average in a combined query.
pub const SEED_WEIGHT: f32 = 0.7;

/// Weight of the phrase vector in a combined query.
pub const TEXT_WEIGHT: f32 = 0.3;

/// Which inputs produced the query vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    Text,
    Seed,
    Combined,
}

/// How the phrase for a prompt was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Edit distance between prompt and phrase.
    Fuzzy,
    /// Overlap with collaborator-supplied tags.
    Tags,
}

/// The phrase standing in for the prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPhrase {
    pub index: usize,
    pub text: String,
    pub source: MatchSource,
}

/// A unit-length query vector and where it came from.
#[derive(Debug, Clone)]
pub struct QueryVector<'a> {
    /// Borrowed straight from the store in text-only mode.
    pub vector: Cow<'a, [f32]>,
    pub mode: QueryMode,
    pub phrase: Option<MatchedPhrase>,
}

/// Builds query vectors from prompts and seed ids.
#[derive(Debug, Clone, Copy)]
pub struct QueryVectorBuilder<'a> {
    store: &'a EmbeddingStore,
    phrases: &'a PhraseMatcher,
    tags: &'a TagMatcher,
}

impl<'a> QueryVectorBuilder<'a> {
    #[must_use]
    pub const fn new(
        store: &'a EmbeddingStore,
        phrases: &'a PhraseMatcher,
        tags: &'a TagMatcher,
    ) -> Self {
        Self {
            store,
            phrases,
            tags,
        }
    }

    /// Build the query for the given inputs.
    ///
    /// `prompt` should already be `None` when blank. `tags` are optional
    /// hints from a tag extractor; non-vocabulary tags are ignored.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] when neither prompt nor seeds are given.
    /// - [`Error::NotFound`] when any seed id is unknown.
    /// - [`Error::DegenerateVector`] when the seeds cancel out.
    pub fn build(
        &self,
        prompt: Option<&str>,
        seed_ids: &[String],
        tags: &[String],
    ) -> Result<QueryVector<'a>> {
        match (prompt, seed_ids.is_empty()) {
            (None, true) => Err(Error::InvalidArgument(
                "must provide either a prompt or seed track ids".to_string(),
            )),
            (Some(prompt), true) => {
                let phrase = self.match_prompt(prompt, tags)?;
                let vector = self.store.phrase_embedding_of(phrase.index)?;
                Ok(QueryVector {
                    vector: Cow::Borrowed(vector),
                    mode: QueryMode::Text,
                    phrase: Some(phrase),
                })
            }
            (None, false) => Ok(QueryVector {
                vector: Cow::Owned(self.seed_vector(seed_ids)?),
                mode: QueryMode::Seed,
                phrase: None,
            }),
            (Some(prompt), false) => {
                let seed = self.seed_vector(seed_ids)?;
                let phrase = self.match_prompt(prompt, tags)?;
                let text = self.store.phrase_embedding_of(phrase.index)?;
                let vector = vector::blend(&seed, SEED_WEIGHT, text, TEXT_WEIGHT)?;
                Ok(QueryVector {
                    vector: Cow::Owned(vector),
                    mode: QueryMode::Combined,
                    phrase: Some(phrase),
                })
            }
        }
    }

    /// Normalized mean of the seed embeddings.
    ///
    /// Any unknown id fails the whole call.
    pub fn seed_vector(&self, seed_ids: &[String]) -> Result<Vec<f32>> {
        let rows = seed_ids
            .iter()
            .map(|id| self.store.embedding_of(id))
            .collect::<Result<Vec<&[f32]>>>()?;
        vector::average(&rows)
    }

    /// Pick the phrase for `prompt`, preferring tag overlap when tags are given.
    pub fn match_prompt(&self, prompt: &str, tags: &[String]) -> Result<MatchedPhrase> {
        let tags = filter_to_vocabulary(tags);
        if let Some(m) = self.tags.find_best(&tags) {
            return self.matched(m.index, MatchSource::Tags);
        }

        let m = self.phrases.find_closest(prompt).ok_or_else(|| Error::NotFound {
            entity: "phrase",
            id: prompt.to_string(),
        })?;
        self.matched(m.index, MatchSource::Fuzzy)
    }

    fn matched(&self, index: usize, source: MatchSource) -> Result<MatchedPhrase> {
        let text = self
            .store
            .phrases()
            .get(index)
            .ok_or(Error::PhraseIndexOutOfRange {
                index,
                len: self.store.phrase_count(),
            })?;
        Ok(MatchedPhrase {
            index,
            text: text.clone(),
            source,
        })
    }
}
