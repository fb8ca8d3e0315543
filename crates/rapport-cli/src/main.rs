//! Rapport CLI - Command-line interface for the Rapport relationship engine.

use clap::Parser;
use rapport_cli::{Cli, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> rapport_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    // RUST_LOG wins over the configured level; logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    let database = cli.database.unwrap_or_else(|| config.database_path.clone());
    let service = rapport_cli::open_service(&database, &config)?;

    let result = rapport_cli::dispatch(cli.command, &service, &formatter);
    tracing::debug!("{}", service.metrics().summary());
    let output = result?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
