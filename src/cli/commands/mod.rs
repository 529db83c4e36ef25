//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod crawl;
mod summarize;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "packscope")]
#[command(about = "Review harvesting and packaging-issue classification")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, harvest all reviews of a product and classify them
    Crawl {
        /// Product or review page URL
        url: String,
        /// Corpus JSON file (default: reviews.json in the crawl folder)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Folder for downloaded images (default: a dated per-product folder)
        #[arg(long)]
        images_dir: Option<PathBuf>,
        /// Re-query at most this many candidate terms
        #[arg(long)]
        max_terms: Option<usize>,
        /// Reviews harvested before keyword re-queries begin
        #[arg(long)]
        batch_size: Option<usize>,
        /// Show the browser window
        #[arg(long)]
        headed: bool,
        /// Account email
        #[arg(long, env = "PACKSCOPE_EMAIL")]
        email: String,
        /// Account password
        #[arg(long, env = "PACKSCOPE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Classify a review text as packaging-related or not
    Classify {
        /// Review text
        text: String,
        /// Review title
        #[arg(short, long, default_value = "")]
        title: String,
    },

    /// Label the sentiment of a text
    Sentiment {
        /// Text to label
        text: String,
    },

    /// Summarize a corpus JSON file written by `crawl`
    Summarize {
        /// Corpus JSON file
        corpus: PathBuf,
    },
}

async fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_path(&path)
            .await
            .with_context(|| format!("Could not load config {}", path.display())),
        None => Ok(Config::load().await),
    }
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config).await?;

    match cli.command {
        Commands::Crawl {
            url,
            output,
            images_dir,
            max_terms,
            batch_size,
            headed,
            email,
            password,
        } => {
            let args = crawl::CrawlArgs {
                url,
                    output,
                images_dir,
                max_terms,
                batch_size,
                headed,
                email,
                password,
            };
            crawl::cmd_crawl(config, args).await
        }
        Commands::Classify { text, title } => analyze::cmd_classify(&config, &title, &text),
        Commands::Sentiment { text } => analyze::cmd_sentiment(&config, &text),
        Commands::Summarize { corpus } => summarize::cmd_summarize(&config, &corpus).await,
    }
}
