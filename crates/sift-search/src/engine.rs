//! The search façade: request validation, query construction, ranking.

use std::collections::HashSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use sift_core::{EmbeddingStore, Error, Result, Track};

use crate::phrase::{PhraseMatch, PhraseMatcher};
use crate::query::{MatchedPhrase, QueryMode, QueryVectorBuilder};
use crate::rank::{rank, SearchHit};
use crate::tags::{TagExtractor, TagMatcher};

/// Results returned when a request omits `limit`.
pub const DEFAULT_LIMIT: usize = 20;

/// Largest accepted `limit`.
pub const MAX_LIMIT: usize = 100;

/// Default cap on seed tracks per request.
pub const DEFAULT_MAX_SEED_TRACKS: usize = 5;

/// Default number of autocomplete suggestions.
pub const DEFAULT_AUTOCOMPLETE_LIMIT: usize = 10;

/// Tunables applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub default_limit: usize,
    pub max_seed_tracks: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_seed_tracks: DEFAULT_MAX_SEED_TRACKS,
        }
    }
}

/// A search over the catalog.
///
/// At least one of `prompt` and `seed_ids` must be present. A blank
/// prompt counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub prompt: Option<String>,

    #[serde(default, alias = "seed_track_ids")]
    pub seed_ids: Vec<String>,

    /// Vocabulary tags for the prompt, if a tag extractor was consulted.
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchRequest {
    /// A text-only request.
    #[must_use]
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    /// A seed-only request.
    #[must_use]
    pub fn seeds<I, S>(seed_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seed_ids: seed_ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The trimmed prompt, or `None` when missing or blank.
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Ranked hits plus a description of how the query was formed.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse<'a> {
    pub hits: Vec<SearchHit<'a>>,
    pub mode: QueryMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_phrase: Option<MatchedPhrase>,
    pub duration_ms: u64,
}

/// Search over a loaded [`EmbeddingStore`].
///
/// The engine only borrows the store; build one per store and share it
/// freely, as every operation is read-only.
#[derive(Debug, Clone)]
pub struct SearchEngine<'a> {
    store: &'a EmbeddingStore,
    phrases: PhraseMatcher,
    tags: TagMatcher,
    options: SearchOptions,
}

impl<'a> SearchEngine<'a> {
    #[must_use]
    pub fn new(store: &'a EmbeddingStore) -> Self {
        Self {
            store,
            phrases: PhraseMatcher::new(store.phrases()),
            tags: TagMatcher::new(store.phrases()),
            options: SearchOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn store(&self) -> &'a EmbeddingStore {
        self.store
    }

    #[must_use]
    pub const fn options(&self) -> SearchOptions {
        self.options
    }

    /// Rank the catalog for `request`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for a missing query, an out-of-range
    ///   limit, or too many seeds.
    /// - [`Error::NotFound`] for an unknown seed id.
    /// - [`Error::DegenerateVector`] when the query vector has zero length.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse<'a>> {
        let started = Instant::now();
        let limit = self.validate(request)?;
        let prompt = request.prompt();

        log::info!(
            "Search request: prompt={:?} seeds={} tags={:?} limit={}",
            prompt,
            request.seed_ids.len(),
            request.tags,
            limit
        );

        let builder = QueryVectorBuilder::new(self.store, &self.phrases, &self.tags);
        let query = builder.build(prompt, &request.seed_ids, &request.tags)?;

        let exclude: HashSet<&str> = request.seed_ids.iter().map(String::as_str).collect();
        let hits = rank(
            &query.vector,
            self.store.catalog_embeddings(),
            self.store.metadata(),
            &exclude,
            limit,
        )?;

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!("Found {} results in {}ms", hits.len(), duration_ms);

        Ok(SearchResponse {
            hits,
            mode: query.mode,
            matched_phrase: query.phrase,
            duration_ms,
        })
    }

    /// Like [`search`](Self::search), asking `extractor` for tags when the
    /// request has a prompt but no tags of its own.
    pub fn search_with_extractor<E: TagExtractor + ?Sized>(
        &self,
        request: &SearchRequest,
        extractor: &E,
    ) -> Result<SearchResponse<'a>> {
        match request.prompt() {
            Some(prompt) if request.tags.is_empty() => {
                let tagged = request.clone().with_tags(extractor.extract(prompt));
                self.search(&tagged)
            }
            _ => self.search(request),
        }
    }

    /// Tracks whose name or artist contains `query`, in catalog order.
    #[must_use]
    pub fn autocomplete(&self, query: &str, limit: usize) -> Vec<&'a Track> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.store
            .metadata()
            .iter()
            .filter(|track| track.matches_text(&needle))
            .take(limit)
            .collect()
    }

    /// The phrase the fuzzy matcher picks for `text`, with its bank entry.
    #[must_use]
    pub fn match_phrase(&self, text: &str) -> Option<(PhraseMatch, &'a str)> {
        let m = self.phrases.find_closest(text)?;
        let phrase = self.store.phrases().get(m.index)?;
        Some((m, phrase.as_str()))
    }

    fn validate(&self, request: &SearchRequest) -> Result<usize> {
        if request.prompt().is_none() && request.seed_ids.is_empty() {
            return Err(Error::InvalidArgument(
                "must provide either a prompt or seed track ids".to_string(),
            ));
        }

        let limit = request.limit.unwrap_or(self.options.default_limit);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(Error::InvalidArgument(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, limit
            )));
        }

        if request.seed_ids.len() > self.options.max_seed_tracks {
            return Err(Error::InvalidArgument(format!(
                "at most {} seed tracks allowed, got {}",
                self.options.max_seed_tracks,
                request.seed_ids.len()
            )));
        }

        Ok(limit)
    }
}
