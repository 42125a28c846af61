use anyhow::Result;
use sift_core::DataFiles;
use sift_search::Config;

pub fn show_status(config: &Config) -> Result<()> {
    println!("\nSift Status\n");
    println!("  Data directory: {}", config.data_dir.display());

    let missing = DataFiles::in_dir(&config.data_dir).missing().len();
    if missing > 0 {
        println!("  Missing data files: {}", missing);
        println!("\n  Pass --data-dir or set data_dir in the config file");
        return Ok(());
    }

    let lazy = super::open_store(config)?;
    let store = lazy.get()?;

    println!("  Tracks: {}", store.len());
    println!("  Phrases: {}", store.phrase_count());
    println!("  Dimensions: {}", store.dim());
    println!("  Default limit: {}", config.default_limit);
    println!("  Max seed tracks: {}", config.max_seed_tracks);

    Ok(())
}
