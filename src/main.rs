mod config;
mod currency;
mod db;
mod error;
mod export;
mod models;
mod planner;
mod run;
mod store;
mod ui;

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;
    init_logging(&config)?;

    let db = db::Database::open(&config.db_path)?;
    let mut planner = planner::Planner::new(db);

    match args.len() {
        1 => run::as_tui(&mut planner),
        2.. => run::as_cli(&args, &mut planner),
        _ => {
            eprintln!("Usage: weddingtui [command]");
            Ok(())
        }
    }
}

/// Logs go to a file: the terminal belongs to the TUI.
fn init_logging(config: &config::Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file: {}", config.log_path.display()))?;
    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("Invalid log filter: {}", config.log_filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "logging initialised");
    Ok(())
}
