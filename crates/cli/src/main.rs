//! AgriHelp CLI
//!
//! Main entry point for the agrihelp tool.
//! Serves the question-answering API and provides maintenance commands.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, SeedCommand, ServeCommand, StatsCommand};
use agrihelp_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// AgriHelp CLI - agricultural question answering service
#[derive(Parser, Debug)]
#[command(name = "agrihelp")]
#[command(about = "Agricultural question answering service", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "AGRIHELP_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the SQLite database
    #[arg(long, global = true, env = "AGRIHELP_DB_PATH")]
    db: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeCommand),

    /// Answer a single question from the terminal
    Ask(AskCommand),

    /// Seed the knowledge table with the built-in snippet corpus
    Seed(SeedCommand),

    /// Show query cache statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.config,
        cli.db,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    config.validate()?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    // Log startup
    tracing::info!("AgriHelp CLI starting");
    tracing::debug!("Storage backend: {}", config.database.backend);
    tracing::debug!("Database: {:?}", config.database.path);

    // Emit command span
    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
        Commands::Seed(_) => "seed",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Seed(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    // Log completion
    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
