use crate::services::youtube_api::DEFAULT_API_BASE_URL;
use env_logger::Builder;
use log::{info, LevelFilter};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PREFERENCES_FILE: &str = "preferences.ini";
pub const DEFAULT_OUTPUT_DIR: &str = "transcripts";

/// Runtime settings, read once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub preferences_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            preferences_path: PathBuf::from(DEFAULT_PREFERENCES_FILE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Config::default();

        Config {
            api_base_url: var("YOUTUBE_API_BASE_URL").unwrap_or(defaults.api_base_url),
            api_key: var("YOUTUBE_API_KEY").map(|key| key.trim().to_string()),
            preferences_path: var("CAPSEARCH_PREFERENCES")
                .map(PathBuf::from)
                .unwrap_or(defaults.preferences_path),
            output_dir: var("CAPSEARCH_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }
}

pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
    info!("Starting caption search...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}
