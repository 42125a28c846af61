use anyhow::Result;
use serde_json::json;
use sift_search::{Config, SearchEngine};

/// List tracks whose name or artist contains `query`.
pub fn find_tracks(config: &Config, query: &str, limit: usize, json: bool) -> Result<()> {
    let lazy = super::open_store(config)?;
    let engine = SearchEngine::new(lazy.get()?);
    let matches = engine.autocomplete(query, limit);

    if json {
        let results: Vec<_> = matches
            .iter()
            .map(|t| {
                json!({
                    "seq_id": t.seq_id,
                    "track_name": t.track_name,
                    "artist": t.artist,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json!({ "results": results }))?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No tracks match \"{}\"", query.trim());
        return Ok(());
    }

    for track in matches {
        println!("{:>8}  {} - {}", track.seq_id, track.track_name, track.artist);
    }

    Ok(())
}
