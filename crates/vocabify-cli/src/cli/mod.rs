//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use vocabify_core::config::Config;

mod commands;

#[derive(Parser)]
#[command(name = "vocabify")]
#[command(version)]
#[command(about = "Vocabify Error Hunt CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Generate a passage with hidden errors and hunt for them
    Hunt {
        /// Topic of the passage
        #[arg(long)]
        topic: String,

        /// Difficulty level (easy, medium, hard)
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// Target passage length in words (50-500)
        #[arg(long, default_value_t = 150)]
        length: u32,

        /// Weakness category to target (repeatable; overrides the config profile)
        #[arg(long = "weakness", value_name = "CATEGORY")]
        weaknesses: Vec<String>,

        /// Override the model from config
        #[arg(short, long)]
        model: Option<String>,

        /// Interactively mark suspected errors after generation
        #[arg(long)]
        interactive: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Write a default config file
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

/// Diagnostics go to stderr; filter via VOCABIFY_LOG (default: warn).
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env("VOCABIFY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Hunt {
            topic,
            difficulty,
            length,
            weaknesses,
            model,
            interactive,
        } => {
            let config = Config::load().context("load config")?;
            commands::hunt::run(commands::hunt::HuntRunOptions {
                config: &config,
                topic: &topic,
                difficulty: &difficulty,
                length,
                weaknesses: &weaknesses,
                model_override: model.as_deref(),
                interactive,
            })
            .await
        }

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
