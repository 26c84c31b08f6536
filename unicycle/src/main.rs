//! Entry point for the unicycle runner binary.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use unicycle::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let episodes = unicycle::run(&cli)?;
    let fell = episodes.iter().filter(|e| e.fell).count();
    tracing::info!("{} episodes run, {fell} ended in a fall", episodes.len());
    Ok(())
}
