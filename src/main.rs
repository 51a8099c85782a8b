use logic_maze::config::{Cli, Config, OutputFormat};
use logic_maze::engine::SearchStatus;
use logic_maze::puzzle::Puzzle;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let puzzle = Puzzle::load_from_file(&cli.puzzle)?;
    let report = puzzle
        .solve(config.limits())
        .with_context(|| format!("cannot build puzzle from {}", cli.puzzle))?;

    match report.status {
        SearchStatus::Found => {}
        SearchStatus::Truncated => warn!("search was cut short before a solution was found"),
        _ => warn!("puzzle has no solution"),
    }

    match config.format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
