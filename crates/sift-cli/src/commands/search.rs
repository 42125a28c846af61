use anyhow::Result;
use sift_search::{Config, KeywordTagExtractor, SearchEngine, SearchRequest, SearchResponse};

/// Arguments of `sift search`.
#[derive(Debug)]
pub struct SearchArgs {
    pub prompt: Option<String>,
    pub seeds: Vec<String>,
    pub tags: Vec<String>,
    pub auto_tags: bool,
    pub limit: Option<usize>,
    pub json: bool,
}

impl SearchArgs {
    fn request(&self) -> SearchRequest {
        SearchRequest {
            prompt: self.prompt.clone(),
            seed_ids: self.seeds.clone(),
            tags: self.tags.clone(),
            limit: self.limit,
        }
    }
}

/// Run a search and print the ranked tracks.
pub fn run_search(config: &Config, args: SearchArgs) -> Result<()> {
    let lazy = super::open_store(config)?;
    let store = lazy.get()?;
    let engine = SearchEngine::new(store).with_options(config.search_options());

    let request = args.request();
    let response = if args.auto_tags {
        engine.search_with_extractor(&request, &KeywordTagExtractor)?
    } else {
        engine.search(&request)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }

    Ok(())
}

fn print_response(response: &SearchResponse<'_>) {
    if let Some(phrase) = &response.matched_phrase {
        println!("Matched phrase: \"{}\" ({:?})", phrase.text, phrase.source);
    }
    println!(
        "{} results ({:?} query, {}ms)\n",
        response.hits.len(),
        response.mode,
        response.duration_ms
    );

    for (rank, hit) in response.hits.iter().enumerate() {
        let track = hit.track;
        println!(
            "{:>3}. {:.4}  {} - {}  [{}]",
            rank + 1,
            hit.similarity,
            track.track_name,
            track.artists().collect::<Vec<_>>().join(", "),
            track.seq_id
        );
        let tags = track.top_tags(3);
        if !tags.is_empty() {
            println!("      {}  {}", track.duration_display(), tags.join(", "));
        }
    }
}
