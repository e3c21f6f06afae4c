//! # repo-notes CLI
//!
//! ```bash
//! repo-notes --config ./config/notes.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `repo-notes serve` | Start the HTTP server |
//! | `repo-notes list` | List every stored note |
//! | `repo-notes get <id>` | Print one note |
//! | `repo-notes add --title <t> --content <c>` | Filter and store a new note |
//!
//! Secrets come from the environment: `GITHUB_TOKEN` and `GEMINI_API_KEY`
//! unless the config names other variables.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use repo_notes::{config, notes, server};

/// Store short notes as JSON files in a GitHub repository.
#[derive(Parser)]
#[command(name = "repo-notes", version)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Built-in defaults are used when the file does not exist.
    #[arg(long, global = true, default_value = "./config/notes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server on `[server].bind`.
    Serve,

    /// List every stored note.
    List,

    /// Print one note by id.
    Get {
        /// Note id (UUID).
        id: String,
    },

    /// Filter and store a new note, printing its id.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Serve => server::run_server(&cfg).await?,
        Commands::List => notes::run_list(&cfg).await?,
        Commands::Get { id } => notes::run_get(&cfg, &id).await?,
        Commands::Add { title, content } => notes::run_add(&cfg, &title, &content).await?,
    }

    Ok(())
}
