//! Fuzzy matching of free text against the curated phrase bank.
//!
//! There is no live text encoder: a prompt is mapped to the closest
//! pre-embedded phrase by edit distance, and that phrase's vector stands in
//! for the prompt's meaning.

use serde::Serialize;

use crate::distance::levenshtein;

/// Factor applied to the distance when one string contains the other.
pub const SUBSTRING_BOOST: f32 = 0.5;

/// The phrase chosen for a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhraseMatch {
    /// Position in the phrase bank (and row in the phrase matrix).
    pub index: usize,
    /// Edit distance after the substring boost.
    pub distance: f32,
}

/// Matches text against a fixed phrase bank.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    normalized: Vec<String>,
}

impl PhraseMatcher {
    /// Build a matcher over `phrases`, keeping bank order.
    #[must_use]
    pub fn new<S: AsRef<str>>(phrases: &[S]) -> Self {
        Self {
            normalized: phrases.iter().map(|p| normalize(p.as_ref())).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// The closest phrase to `query`, or `None` for an empty bank.
    ///
    /// Ties go to the earliest phrase in bank order.
    #[must_use]
    pub fn find_closest(&self, query: &str) -> Option<PhraseMatch> {
        let query = normalize(query);

        let mut best: Option<PhraseMatch> = None;
        for (index, phrase) in self.normalized.iter().enumerate() {
            let distance = adjusted_distance(&query, phrase);
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(PhraseMatch { index, distance });
            }
        }

        if let Some(m) = best {
            log::debug!(
                "Matched \"{}\" to phrase \"{}\" (distance: {:.2})",
                query,
                self.normalized[m.index],
                m.distance
            );
        }
        best
    }
}

/// Lowercase and trim.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn adjusted_distance(query: &str, phrase: &str) -> f32 {
    let distance = levenshtein(query, phrase) as f32;
    if phrase.contains(query) || query.contains(phrase) {
        distance * SUBSTRING_BOOST
    } else {
        distance
    }
}
