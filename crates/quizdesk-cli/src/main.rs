//! quizdesk CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quizdesk_store::{load_config_from, QuizdeskConfig};

mod commands;
mod console;

/// Log filter used when `RUST_LOG` is unset. Scoped to the quizdesk crates so
/// dependencies keep their own defaults.
const DEFAULT_LOG_DIRECTIVE: &str = "quizdesk=warn";

#[derive(Parser)]
#[command(
    name = "quizdesk",
    version,
    about = "Console quiz authoring and quiz taking"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding users.txt, quizzes.txt and results.txt
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive menus (default)
    Interactive,

    /// Show the highest quiz scores
    Leaderboard {
        /// Number of entries (default: leaderboard_size from config)
        #[arg(long)]
        top: Option<usize>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show one user's quiz results
    History {
        /// Login of the user
        #[arg(long)]
        user: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check the data files for malformed lines and authoring problems
    Validate,

    /// Create a starter config and a sample quiz file
    Init,
}

fn load_config(cli: &Cli) -> Result<QuizdeskConfig> {
    let mut config = load_config_from(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => commands::interactive::execute(config),
        Commands::Leaderboard { top, format } => {
            commands::leaderboard::execute(&config, top, &format)
        }
        Commands::History { user, format } => commands::history::execute(&config, &user, &format),
        Commands::Validate => commands::validate::execute(&config),
        Commands::Init => commands::init::execute(&config),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
