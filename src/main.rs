//! tts-narrator CLI - озвучивание книг и постов несколькими голосами

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use tts_narrator::notification::{LogProgressObserver, ProgressBarObserver};
use tts_narrator::source::{filter_and_save_posts, read_book, scraper::DEFAULT_HOST, PostScraper};
use tts_narrator::speaker::{OpenAiChatClient, SpeakerResolver};
use tts_narrator::{Narration, Narrator, NarratorConfig, PostTracker, WorkSource};

#[derive(Parser)]
#[command(name = "tts-narrator")]
#[command(about = "Narrate books and posts with a distinct voice per speaker", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file; missing fields use defaults
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Narrate a local text file
    Book {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Narrate the next unread post from a saved posts list
    NextPost {
        /// JSON file written by `scrape`
        #[arg(long, value_name = "FILE")]
        posts: PathBuf,

        /// Directory for read markers
        #[arg(long, value_name = "DIR", default_value = "books")]
        books_dir: PathBuf,
    },
    /// Fetch all posts of a user and save those matching the filter
    Scrape {
        #[arg(long, value_name = "ID")]
        user: String,

        #[arg(long, default_value = "patreon")]
        service: String,

        /// Keep posts whose title contains this text
        #[arg(long, default_value = "")]
        filter: String,

        #[arg(short, long, value_name = "FILE", default_value = "filtered_posts.json")]
        output: PathBuf,

        #[arg(long, default_value = DEFAULT_HOST)]
        base_url: String,
    },
    /// Print synthesis requests for a text file without generating audio
    Segments {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<NarratorConfig> {
    let mut config = match path {
        Some(path) => NarratorConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => NarratorConfig::default(),
    };
    config.apply_env();
    Ok(config)
}

async fn narrate(config: NarratorConfig, source: WorkSource, verbose: u8) -> Result<()> {
    let mut narrator = Narrator::new(config);
    if verbose > 0 {
        narrator.add_observer(Box::new(LogProgressObserver));
    } else {
        narrator.add_observer(Box::new(ProgressBarObserver::default()));
    }

    match narrator.narrate(source).await? {
        Narration::Saved(path) => println!("{}", path.display()),
        Narration::Skipped(title) => println!("Skipped {}: no text to narrate", title),
        Narration::Exhausted => println!("No unread posts left"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Book { file } => narrate(config, WorkSource::Book(file), cli.verbose).await?,
        Commands::NextPost { posts, books_dir } => {
            let tracker = PostTracker::new(posts, books_dir);
            narrate(config, WorkSource::NextPost(tracker), cli.verbose).await?
        }
        Commands::Scrape { user, service, filter, output, base_url } => {
            let posts = PostScraper::new(base_url).fetch_all_posts(&service, &user).await;
            let saved = filter_and_save_posts(&posts, &filter, &output)?;
            println!("Saved {} of {} posts to {}", saved.len(), posts.len(), output.display());
        }
        Commands::Segments { file } => {
            config.validate()?;
            let text = read_book(&file)?;
            let resolver = SpeakerResolver::new(Box::new(OpenAiChatClient::new(&config)?), &config);
            let narrator = Narrator::new(config);
            let requests = narrator.build_requests_with(&text, resolver).await?;
            println!("{}", serde_json::to_string_pretty(&requests)?);
        }
    }

    Ok(())
}
