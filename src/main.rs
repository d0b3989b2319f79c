mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pensieve::config::PensieveConfig;

#[derive(Parser)]
#[command(name = "pensieve", version, about = "Extract character memories from narrative text")]
struct Cli {
    /// Config file (defaults to ~/.pensieve/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Gather a character's memories and write them as JSON
    Extract {
        /// Directory holding one text file per book
        #[arg(long)]
        corpus_dir: PathBuf,
        /// Character name; each word is used as an alias
        #[arg(long)]
        name: String,
        /// Directory of per-book mood files (<book>.json)
        #[arg(long)]
        mood_dir: Option<PathBuf>,
        /// Look up an image for every memory
        #[arg(long)]
        images: bool,
        /// Output directory (defaults to export.output_dir)
        #[arg(long)]
        save_dir: Option<PathBuf>,
        /// Mention density threshold
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Print the paragraphs selected for a character
    Paragraphs {
        #[arg(long)]
        corpus_dir: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Show per-book paragraph counts and frequent words
    Stats {
        #[arg(long)]
        corpus_dir: PathBuf,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Print one book's character co-occurrence graph as JSON
    Graph {
        #[arg(long)]
        corpus_dir: PathBuf,
        #[arg(long)]
        book: u32,
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PensieveConfig::load_from(path)?,
        None => PensieveConfig::load()?,
    };

    // Logs go to stderr; stdout carries command output.
    let filter = EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Corpus passes block on analysis and image lookups.
    tokio::task::spawn_blocking(move || run(cli.command, config)).await?
}

fn run(command: Command, config: PensieveConfig) -> Result<()> {
    match command {
        Command::Extract {
            corpus_dir,
            name,
            mood_dir,
            images,
            save_dir,
            threshold,
        } => cli::extract::extract(
            config,
            cli::extract::ExtractArgs {
                corpus_dir,
                name,
                mood_dir,
                images,
                save_dir,
                threshold,
            },
        ),
        Command::Paragraphs {
            corpus_dir,
            name,
            threshold,
        } => cli::paragraphs::paragraphs(config, &corpus_dir, &name, threshold),
        Command::Stats { corpus_dir, top } => cli::stats::stats(config, &corpus_dir, top),
        Command::Graph {
            corpus_dir,
            book,
            top,
        } => cli::graph::graph(config, &corpus_dir, book, top),
    }
}
