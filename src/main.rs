//! Lifegraph CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lifegraph")]
#[command(about = "Graph index over a personal journal of timestamped entries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Indexer config file (defaults to $LIFEGRAPH_CONFIG, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Index entry files and print a summary
    Import {
        /// JSON array or JSON-lines files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List tags with how many entries carry them
    Tags {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Include private tags
        #[arg(short, long)]
        private: bool,
    },
    /// List the entries dated on a day (YYYY-MM-DD, UTC)
    Day {
        date: String,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Index entry files and verify the index invariants
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "lifegraph={}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Lifegraph v{}", env!("CARGO_PKG_VERSION"));

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Import { files } => commands::import(config, &files),
        Commands::Tags { files, private } => commands::tags(config, &files, private),
        Commands::Day { date, files } => commands::day(config, &date, &files),
        Commands::Check { files } => commands::check(config, &files),
        Commands::Version => {
            println!("Lifegraph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
