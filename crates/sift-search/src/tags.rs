//! Tag-driven phrase selection.
//!
//! An external collaborator (typically a language model) reduces a prompt
//! to a few tags from [`TAG_VOCABULARY`]. [`TagMatcher`] then picks the
//! phrase that mentions the most of those tags, breaking ties by edit
//! distance to the joined tag string.

use serde::Serialize;

use crate::distance::levenshtein;
use crate::phrase::normalize;

/// Tags an extractor may emit. Anything else is discarded.
pub const TAG_VOCABULARY: [&str; 34] = [
    "piano",
    "guitar",
    "sad",
    "melancholic",
    "nostalgic",
    "hopeful",
    "peaceful",
    "dark",
    "lonely",
    "slow",
    "mellow",
    "sleepy",
    "upbeat",
    "groovy",
    "bossa nova",
    "vinyl crackle",
    "ambient",
    "spacey",
    "bass-heavy",
    "minimal",
    "rain",
    "ocean",
    "night",
    "cafe",
    "winter",
    "home",
    "nature",
    "space",
    "cozy",
    "warm",
    "dreamy",
    "focus",
    "jazz",
    "chill",
];

/// Upper bound on tags taken from a single prompt.
pub const MAX_TAGS: usize = 5;

/// Whether `tag` is in [`TAG_VOCABULARY`].
#[must_use]
pub fn is_vocabulary_tag(tag: &str) -> bool {
    TAG_VOCABULARY.contains(&tag)
}

/// Keep vocabulary tags only, in input order, without repeats.
#[must_use]
pub fn filter_to_vocabulary<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref();
        if !is_vocabulary_tag(tag) {
            log::debug!("Dropping tag \"{}\": not in the tag vocabulary", tag);
        } else if !kept.iter().any(|k| k == tag) {
            kept.push(tag.to_string());
        }
    }
    kept
}

/// Source of tags for a free-text prompt.
///
/// Implementations must not fail: a broken or unavailable backend returns
/// an empty list and the caller falls back to fuzzy phrase matching.
pub trait TagExtractor {
    fn extract(&self, prompt: &str) -> Vec<String>;
}

/// Offline extractor that spots vocabulary tags written in the prompt.
///
/// A tag matches when it appears as a whole word (or word sequence for
/// multi-word tags), ignoring case and punctuation.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTagExtractor;

impl TagExtractor for KeywordTagExtractor {
    fn extract(&self, prompt: &str) -> Vec<String> {
        let cleaned: String = prompt
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { ' ' })
            .collect();
        let padded = format!(" {} ", cleaned.split_whitespace().collect::<Vec<_>>().join(" "));

        let tags: Vec<String> = TAG_VOCABULARY
            .iter()
            .filter(|tag| padded.contains(&format!(" {} ", tag)))
            .take(MAX_TAGS)
            .map(|tag| (*tag).to_string())
            .collect();

        log::debug!("Extracted tags {:?} from \"{}\"", tags, prompt);
        tags
    }
}

/// The phrase chosen for a tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagMatch {
    pub index: usize,
    /// Number of tags found in the phrase.
    pub score: usize,
    /// Edit distance between the joined tags and the phrase.
    pub distance: usize,
}

/// Scores phrases by tag overlap.
#[derive(Debug, Clone)]
pub struct TagMatcher {
    normalized: Vec<String>,
}

impl TagMatcher {
    #[must_use]
    pub fn new<S: AsRef<str>>(phrases: &[S]) -> Self {
        Self {
            normalized: phrases.iter().map(|p| normalize(p.as_ref())).collect(),
        }
    }

    /// The phrase containing the most tags.
    ///
    /// Equal scores are broken by the smaller edit distance to the
    /// space-joined tags, then by bank order. Phrases that contain none of
    /// the tags never match, so `None` means no phrase overlaps the tag
    /// set (or the tag set is empty).
    #[must_use]
    pub fn find_best<S: AsRef<str>>(&self, tags: &[S]) -> Option<TagMatch> {
        let tags: Vec<String> = tags.iter().map(|t| normalize(t.as_ref())).collect();
        if tags.is_empty() {
            return None;
        }
        let tag_query = tags.join(" ");

        let mut best: Option<TagMatch> = None;
        for (index, phrase) in self.normalized.iter().enumerate() {
            let score = tags.iter().filter(|tag| phrase.contains(tag.as_str())).count();
            if score == 0 {
                continue;
            }

            let distance = levenshtein(&tag_query, phrase);
            let better = match best {
                None => true,
                Some(b) => score > b.score || (score == b.score && distance < b.distance),
            };
            if better {
                best = Some(TagMatch {
                    index,
                    score,
                    distance,
                });
            }
        }

        match best {
            Some(m) => log::debug!(
                "Matched tags {:?} to phrase \"{}\" (score: {}/{}, distance: {})",
                tags,
                self.normalized[m.index],
                m.score,
                tags.len(),
                m.distance
            ),
            None => log::debug!("No phrase overlaps tags {:?}", tags),
        }
        best
    }
}
