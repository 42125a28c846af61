use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::{SearchOptions, DEFAULT_LIMIT, DEFAULT_MAX_SEED_TRACKS, MAX_LIMIT};

/// Configuration for sift.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (SIFT_* prefix)
/// 3. Config file (~/.config/sift/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the embedding matrices, metadata and phrase bank.
    ///
    /// Can be set via:
    /// - CLI: --data-dir /path/to/data
    /// - ENV: SIFT_DATA_DIR
    /// - Config: data_dir = "/path/to/data"
    /// - Default: ~/.local/share/sift/data
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Number of results when a search does not ask for a specific count.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Maximum number of seed tracks accepted per search.
    #[serde(default = "default_max_seed_tracks")]
    pub max_seed_tracks: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_limit: default_limit(),
            max_seed_tracks: default_max_seed_tracks(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/sift/config.toml
    /// Reads environment variables with SIFT_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed, or
    /// if the loaded values are out of range.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("sift");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration with a custom data directory.
    ///
    /// This is used when the --data-dir CLI flag is provided.
    pub fn load_with_data_dir(data_dir: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.data_dir = data_dir;
        Ok(config)
    }

    /// Check that numeric settings are usable.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_LIMIT).contains(&self.default_limit) {
            anyhow::bail!(
                "default_limit must be between 1 and {}, got {}",
                MAX_LIMIT,
                self.default_limit
            );
        }
        if self.max_seed_tracks == 0 {
            anyhow::bail!("max_seed_tracks must be at least 1");
        }
        Ok(())
    }

    /// Search options derived from this configuration.
    #[must_use]
    pub const fn search_options(&self) -> SearchOptions {
        SearchOptions {
            default_limit: self.default_limit,
            max_seed_tracks: self.max_seed_tracks,
        }
    }
}

const fn default_limit() -> usize {
    DEFAULT_LIMIT
}

const fn default_max_seed_tracks() -> usize {
    DEFAULT_MAX_SEED_TRACKS
}

/// Get the default data directory.
///
/// Returns: ~/.local/share/sift/data (or platform equivalent)
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sift")
        .join("data")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/sift/config.toml
/// - macOS: ~/Library/Application Support/sift/config.toml
/// - Windows: %APPDATA%\sift\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sift")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Sift Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (SIFT_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Directory containing the search data set:
#   embeddings.bin, metadata.json, phrase_embeddings.bin, phrases.json
#
# Can also be set via:
# - CLI: sift --data-dir /custom/data search --prompt "rainy night"
# - Environment: SIFT_DATA_DIR=/custom/data
#
# Default: Platform-specific data directory
#data_dir = "/path/to/sift/data"

# Number of results returned when a search does not pass --limit (1-100)
default_limit = 20

# Maximum number of seed tracks per search
max_seed_tracks = 5
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
