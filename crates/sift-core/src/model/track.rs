use serde::{Deserialize, Serialize};

/// A weighted descriptive tag attached to a track (e.g. "chill", 0.82).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagScore {
    pub name: String,
    pub score: f64,
}

impl TagScore {
    #[must_use]
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// A catalog track.
///
/// Position in the metadata array matches the row of the catalog
/// embedding matrix, so a `Track` is only meaningful alongside the store
/// that loaded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Stable internal identifier, used as the embedding row key.
    pub seq_id: String,

    /// Spotify track identifier.
    pub spotify_id: String,

    pub track_name: String,

    /// Artist credit; multiple artists are separated by `;`.
    pub artist: String,

    pub album: String,

    pub duration_ms: u64,

    /// Spotify popularity, 0-100.
    pub popularity: u32,

    #[serde(default)]
    pub tags: Vec<TagScore>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_art_url: Option<String>,
}

impl Track {
    #[must_use]
    pub fn new(
        seq_id: impl Into<String>,
        spotify_id: impl Into<String>,
        track_name: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            seq_id: seq_id.into(),
            spotify_id: spotify_id.into(),
            track_name: track_name.into(),
            artist: artist.into(),
            album: String::new(),
            duration_ms: 0,
            popularity: 0,
            tags: Vec::new(),
            album_art_url: None,
        }
    }

    /// Individual artist names from the `;`-delimited credit.
    pub fn artists(&self) -> impl Iterator<Item = &str> {
        self.artist
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Duration formatted as `m:ss`.
    #[must_use]
    pub fn duration_display(&self) -> String {
        let total_secs = self.duration_ms / 1000;
        format!("{}:{:02}", total_secs / 60, total_secs % 60)
    }

    /// Tag names ordered by descending score.
    #[must_use]
    pub fn top_tags(&self, n: usize) -> Vec<&str> {
        let mut tags: Vec<&TagScore> = self.tags.iter().collect();
        tags.sort_by(|a, b| b.score.total_cmp(&a.score));
        tags.into_iter().take(n).map(|t| t.name.as_str()).collect()
    }

    /// Case-insensitive substring match on track name or artist.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        self.track_name.to_lowercase().contains(needle)
            || self.artist.to_lowercase().contains(needle)
    }
}
