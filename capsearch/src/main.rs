use anyhow::{bail, Context, Result};
use capsearch::config::{init_logger, load_environment, Config};
use capsearch::prompt::Prompter;
use capsearch::services::caption_fetcher::TranscriptFetcher;
use capsearch::services::enumerator::split_id_list;
use capsearch::services::orchestrator::Orchestrator;
use capsearch::services::preferences::PreferenceStore;
use capsearch::services::result_writer::default_output_path;
use capsearch::services::youtube_api::YouTubeDataClient;
use capsearch::{RunSummary, SearchMode, SearchRequest};
use clap::Parser;
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Search YouTube video captions for a word or phrase.
///
/// Without --keyword the search is configured interactively.
#[derive(Debug, Parser)]
#[command(name = "capsearch", version, about)]
struct Cli {
    /// YouTube Data API key. Overrides the stored key.
    #[arg(long)]
    api_key: Option<String>,

    /// Save the provided API key to the preferences file.
    #[arg(long, requires = "api_key")]
    save_api_key: bool,

    /// Channel ID, channel URL or @handle to search.
    #[arg(long, requires = "keyword", conflicts_with_all = ["video_ids", "video_file"])]
    channel: Option<String>,

    /// Number of newest channel videos to search.
    #[arg(long, default_value_t = 10)]
    max_results: usize,

    /// Comma separated video IDs or URLs.
    #[arg(long, requires = "keyword", conflicts_with = "video_file")]
    video_ids: Option<String>,

    /// File with one video ID or URL per line.
    #[arg(long, requires = "keyword")]
    video_file: Option<PathBuf>,

    /// The word or phrase to search for in captions.
    #[arg(long)]
    keyword: Option<String>,

    /// Caption language code.
    #[arg(long, default_value = "en")]
    language: String,

    /// Exact output file. Defaults to <output-dir>/<keyword>_matches.txt.
    #[arg(long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Directory for result files.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    load_environment();
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let config = Config::from_env();

    match run(cli, config).await {
        Ok(summary) => {
            println!("\n{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: Config) -> Result<RunSummary> {
    let store = PreferenceStore::new(&config.preferences_path);
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    let interactive = cli.keyword.is_none();

    let api_key = resolve_api_key(&cli, &config, &store, interactive.then_some(&mut prompter))?;
    let catalog = YouTubeDataClient::new(&config.api_base_url, &api_key);
    let captions = TranscriptFetcher::new()?;
    let mut orchestrator = Orchestrator::new(&catalog, &captions);

    let request = if interactive {
        let choice = prompter.mode()?;
        orchestrator.collecting_input();
        prompter.request(choice)?
    } else {
        orchestrator.collecting_input();
        request_from_flags(&cli)?
    };

    let output_dir = cli.output_dir.clone().unwrap_or(config.output_dir);
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&output_dir, &request.phrase));

    Ok(orchestrator.run(&request, &output_path).await?)
}

/// `--api-key`, then `YOUTUBE_API_KEY`, then the preferences file (or a prompt).
fn resolve_api_key<R: BufRead, W: Write>(
    cli: &Cli,
    config: &Config,
    store: &PreferenceStore,
    prompter: Option<&mut Prompter<R, W>>,
) -> Result<String> {
    if let Some(key) = cli.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        info!("Using API key provided via argument.");
        if cli.save_api_key {
            store.save(key)?;
            info!("API key saved to {}.", store.path().display());
        }
        return Ok(key.to_string());
    }

    if let Some(key) = &config.api_key {
        info!("Using API key from YOUTUBE_API_KEY.");
        return Ok(key.clone());
    }

    let stored = store.load();
    match prompter {
        Some(prompter) => match prompter.api_key(stored.as_deref())? {
            Some(key) => {
                store.save(&key)?;
                Ok(key)
            }
            None => stored.context("no API key stored"),
        },
        None => match stored {
            Some(key) => {
                info!("Using API key from {}.", store.path().display());
                Ok(key)
            }
            None => bail!(
                "YouTube Data API key not found. Provide one with --api-key, YOUTUBE_API_KEY or {}",
                store.path().display()
            ),
        },
    }
}

fn request_from_flags(cli: &Cli) -> Result<SearchRequest> {
    let mode = if let Some(channel) = &cli.channel {
        SearchMode::Channel {
            channel: channel.clone(),
            count: cli.max_results,
        }
    } else if let Some(ids) = &cli.video_ids {
        SearchMode::ExplicitList(split_id_list(ids))
    } else if let Some(path) = &cli.video_file {
        SearchMode::FileList(path.clone())
    } else {
        bail!("one of --channel, --video-ids or --video-file is required with --keyword");
    };

    let keyword = cli.keyword.as_deref().unwrap_or_default();
    Ok(SearchRequest::new(mode, keyword, &cli.language)?)
}
