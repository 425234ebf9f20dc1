use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use pricewatch::config::{self, AppConfig};
use pricewatch::fetcher::PageFetcher;
use pricewatch::notifier::EmailNotifier;
use pricewatch::tracker::{SystemClock, TrackingLoop};
use pricewatch::wordmine::WordMiner;

#[derive(Parser)]
#[command(
    name = "pricewatch",
    version,
    about = "Tracks a product's price and emails an alert when it drops below a threshold"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Watch the configured product page on a fixed interval
    Track {
        /// Path to the configuration file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
        /// Run a single check and exit instead of looping
        #[arg(long)]
        once: bool,
    },
    /// Scrape a page's headlines and report the most frequent words
    Mine {
        /// Page to scrape
        #[arg(long)]
        url: String,
        /// How many words to report
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pricewatch=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Track {
        config: PathBuf::from("config.toml"),
        once: false,
    }) {
        Command::Track { config, once } => track(&config, once).await,
        Command::Mine { url, top } => mine(&url, top).await,
    }
}

async fn track(config_path: &Path, once: bool) -> Result<()> {
    // Configuration problems are the one fatal class of error; nothing
    // network-facing has run yet at this point.
    let config = match AppConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %config_path.display(), %e, "failed to load configuration");
            process::exit(2);
        }
    };

    let notifier = Box::new(EmailNotifier::new(&config));
    let tracker = TrackingLoop::new(config, notifier, Box::new(SystemClock))?;

    if once {
        tracker.run_cycle().await;
        return Ok(());
    }

    tokio::select! {
        _ = tracker.run() => unreachable!("the tracking loop has no terminal state"),
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    Ok(())
}

async fn mine(url: &str, top: usize) -> Result<()> {
    let fetcher = PageFetcher::new(&config::default_user_agent())?;
    let miner = WordMiner::new();

    let html = fetcher.fetch(url).await?;
    let headlines = miner.headlines(&html);

    println!("=== SCRAPED HEADLINES ===");
    for headline in &headlines {
        println!("- {headline}");
    }

    println!("\n=== TOP KEYWORDS ===");
    for entry in miner.top_words(&headlines.join(" "), top) {
        println!("{}: {}", entry.word, entry.count);
    }

    Ok(())
}
