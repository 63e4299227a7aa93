use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chess_rules::cli::command_loop::run_stdio_loop;
use chess_rules::config::EngineConfig;

/// Play and inspect chess positions from stdin.
#[derive(Debug, Parser)]
#[command(name = "chess_rules", version, about)]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    run_stdio_loop(config)?;
    Ok(())
}
