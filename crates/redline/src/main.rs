//! Redline - conflict-aware document editing.
//!
//! This is the main entry point for the redline CLI.

mod commands;

use clap::{Parser, Subcommand};
use commands::{init_logging, log_target, run_check, run_serve, show_config};
use redline_core::Config;
use redline_util::log::LogLevel;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redline")]
#[command(author, version, about = "Conflict-aware document editing over MCP", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    /// Directory bare document names resolve against
    #[arg(long, global = true)]
    documents_dir: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdin/stdout
    Serve {
        /// Refuse documents outside the documents directory
        #[arg(long)]
        confine: bool,
        /// Write logs to a file instead of stderr (default: the platform log directory)
        #[arg(long, num_args = 0..=1, value_name = "PATH")]
        log_file: Option<Option<PathBuf>>,
    },
    /// Report the tracking state of documents
    Check {
        /// Documents to check
        #[arg(required = true)]
        paths: Vec<String>,
        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show configuration
    Config,
    /// Print version information
    Version,
}

fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::parse(s).ok_or_else(|| format!("unknown log level: {s}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let mut overrides = Config {
        documents_dir: cli
            .documents_dir
            .as_ref()
            .map(|dir| dir.display().to_string()),
        log_level: cli.log_level,
        ..Default::default()
    };
    if let Commands::Serve { confine: true, .. } = cli.command {
        overrides.confine_to_root = Some(true);
    }

    let (config, sources) = Config::load(Some(&cwd)).await?;
    let config = config.merge(overrides);
    config.validate()?;

    let log_file = match &cli.command {
        Commands::Serve { log_file, .. } => log_file.clone(),
        _ => None,
    };
    // One-shot commands stay quiet unless asked.
    let level = match (&cli.command, cli.verbose) {
        _ if cli.log_level.is_some() => config.log_level(),
        (_, true) => LogLevel::Debug,
        (Commands::Serve { .. }, false) => config.log_level(),
        _ => LogLevel::Warn,
    };
    if let Some(path) = init_logging(level, log_target(log_file)) {
        eprintln!("Logs: {}", path.display());
    }

    match cli.command {
        Commands::Serve { .. } => run_serve(config, sources).await,
        Commands::Check { paths, json } => run_check(config, sources, &paths, json).await,
        Commands::Config => show_config(&config, &sources),
        Commands::Version => Ok(()),
    }
}

/// Print version information.
fn print_version() {
    println!("redline {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Conflict-aware document editing for shared documents.");
}
