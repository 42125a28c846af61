use anyhow::Result;
use sift_search::{Config, KeywordTagExtractor, SearchEngine, TagExtractor, TagMatcher};

/// Show the phrase a description maps to, by fuzzy match and by tags.
pub fn show_phrase(config: &Config, text: &str) -> Result<()> {
    let lazy = super::open_store(config)?;
    let store = lazy.get()?;
    let engine = SearchEngine::new(store);

    match engine.match_phrase(text) {
        Some((m, phrase)) => {
            println!(
                "Fuzzy match: \"{}\" (index {}, distance {:.1})",
                phrase, m.index, m.distance
            );
        }
        None => println!("Phrase bank is empty"),
    }

    let tags = KeywordTagExtractor.extract(text);
    if tags.is_empty() {
        println!("Tags:        none from the vocabulary");
        return Ok(());
    }
    println!("Tags:        {}", tags.join(", "));

    match TagMatcher::new(store.phrases()).find_best(&tags) {
        Some(m) => println!(
            "Tag match:   \"{}\" ({}/{} tags, distance {})",
            store.phrases()[m.index],
            m.score,
            tags.len(),
            m.distance
        ),
        None => println!("Tag match:   no phrase mentions these tags"),
    }

    Ok(())
}
