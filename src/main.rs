use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;
mod config;
mod corpus;
mod document;
mod lint;

use cli::{Cli, Commands};
use config::{Config, LogLevel};

fn setup_logging(log_level: LogLevel, verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("agentdoc")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("agentdoc.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, then --verbose, then config log_level
    let mut builder = env_logger::Builder::new();
    let from_env = std::env::var("RUST_LOG").is_ok();

    if from_env {
        builder.parse_default_env();
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else {
        builder.filter_level(log_level.to_level_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        if verbose && !from_env { "debug" } else { log_level.as_filter() },
        if from_env {
            "RUST_LOG env"
        } else if verbose {
            "--verbose"
        } else {
            "config"
        }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let verbosity = commands::Verbosity::from_flags(cli.verbose, cli.quiet);
    match cli.command {
        Commands::Lint { paths, strict, format } => {
            commands::lint::run(&paths, strict, cli::OutputFormat::resolve(format), verbosity, &config)
        }
        Commands::List { paths, format } => commands::list::run(&paths, cli::OutputFormat::resolve(format), &config),
        Commands::Show { name, format } => commands::show::run(&name, cli::OutputFormat::resolve(format), &config),
        Commands::Refs { paths, mermaid, format } => {
            commands::refs::run(&paths, mermaid, cli::OutputFormat::resolve(format), &config)
        }
        Commands::Fmt { paths, write, check } => commands::fmt::run(&paths, write, check, verbosity, &config),
        Commands::New { name, tools, dir } => commands::new::run(&name, &tools, dir, &config),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging with log level from config (or RUST_LOG env var)
    setup_logging(config.log_level, cli.verbose).context("Failed to setup logging")?;

    info!("Starting agentdoc with config from: {:?}", cli.config);

    // Run the command
    run(cli, config).context("Command failed")?;

    Ok(())
}
