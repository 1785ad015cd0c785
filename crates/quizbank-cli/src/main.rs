//! quizbank CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizbank", version, about = "Multiple-choice quiz player")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz in the terminal
    Play {
        /// Source name from the config (default: `default_source`)
        #[arg(long)]
        source: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the result of each completed round as JSON
        #[arg(long)]
        save_result: Option<PathBuf>,
    },

    /// Parse a quiz document and report problems
    Validate {
        /// Path to an .xml or .json quiz
        #[arg(long)]
        file: PathBuf,

        /// Document format: markup, json (inferred from the extension when omitted)
        #[arg(long)]
        format: Option<String>,

        /// Print the parsed quiz and warnings as JSON
        #[arg(long)]
        json: bool,
    },

    /// List configured quiz sources
    ListSources {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Load every source and report its status
        #[arg(long)]
        check: bool,
    },

    /// Create starter config and sample quiz asset
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizbank=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            source,
            config,
            save_result,
        } => commands::play::execute(source, config, save_result).await,
        Commands::Validate { file, format, json } => {
            commands::validate::execute(file, format, json)
        }
        Commands::ListSources { config, check } => {
            commands::list_sources::execute(config, check).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
