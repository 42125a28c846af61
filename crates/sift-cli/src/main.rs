use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use sift_search::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "sift", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the search data set (default: ~/.local/share/sift/data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend tracks from a description, seed tracks, or both
    ///
    /// The prompt is matched to the closest phrase in the curated phrase
    /// bank and that phrase's embedding stands in for the text. Seed tracks
    /// are averaged. When both are given the query is 70% seeds and 30%
    /// text. Seed tracks never appear in the results.
    ///
    /// Use 'sift tracks <query>' to look up seed ids.
    Search {
        /// Free-text description of the music you want
        #[arg(short, long)]
        prompt: Option<String>,

        /// Seed track id (repeatable, up to 5)
        #[arg(short, long = "seed")]
        seeds: Vec<String>,

        /// Vocabulary tag describing the prompt (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Pick tags from the prompt's own words
        #[arg(long, conflicts_with = "tags")]
        auto_tags: bool,

        /// Number of results (1-100)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find tracks by name or artist
    Tracks {
        /// Text to look for in track names and artists
        query: String,

        /// Maximum number of matches
        #[arg(short, long, default_value_t = sift_search::engine::DEFAULT_AUTOCOMPLETE_LIMIT)]
        limit: usize,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show which phrase a description maps to
    Phrase {
        /// Free-text description
        text: String,
    },
    /// Show data set status
    Status,
    /// Inspect or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn load_config(data_dir: Option<PathBuf>) -> Result<Config> {
    match data_dir {
        Some(dir) => Config::load_with_data_dir(dir),
        None => Config::load(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_dir = cli.data_dir;

    match cli.command {
        Commands::Search {
            prompt,
            seeds,
            tags,
            auto_tags,
            limit,
            json,
        } => {
            let args = commands::search::SearchArgs {
                prompt,
                seeds,
                tags,
                auto_tags,
                limit,
                json,
            };
            commands::run_search(&load_config(data_dir)?, args)?;
        }
        Commands::Tracks { query, limit, json } => {
            commands::find_tracks(&load_config(data_dir)?, &query, limit, json)?;
        }
        Commands::Phrase { text } => {
            commands::show_phrase(&load_config(data_dir)?, &text)?;
        }
        Commands::Status => {
            commands::show_status(&load_config(data_dir)?)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&load_config(data_dir)?)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
