pub mod config;
pub mod phrase;
pub mod search;
pub mod status;
pub mod tracks;

pub use phrase::show_phrase;
pub use search::run_search;
pub use status::show_status;
pub use tracks::find_tracks;

use anyhow::{Context, Result};
use sift_core::{DataFiles, LazyStore, EMBEDDING_DIM};
use sift_search::Config;

/// Load the store from the configured data directory.
fn open_store(config: &Config) -> Result<LazyStore> {
    let files = DataFiles::in_dir(&config.data_dir);

    let missing = files.missing();
    if !missing.is_empty() {
        let list: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
        anyhow::bail!(
            "Data set is incomplete, missing:\n  {}\n\nSet data_dir in the config file or pass --data-dir.",
            list.join("\n  ")
        );
    }

    log::debug!("Using data directory {}", config.data_dir.display());
    let store = LazyStore::new(files, EMBEDDING_DIM);
    store
        .get()
        .with_context(|| format!("Failed to load data set from {}", config.data_dir.display()))?;
    Ok(store)
}
