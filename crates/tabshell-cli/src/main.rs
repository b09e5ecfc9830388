//! tabshell CLI
//!
//! Loads a permission dataset and a route catalog, then either prints the
//! sidebar a user would see or replays a script of navigations and tab
//! commands against a fully wired shell.
//!
//! ```bash
//! tabshell --permissions demos/permissions.json --catalog demos/routes.toml menu --user manager
//! tabshell --permissions demos/permissions.json --catalog demos/routes.toml replay --script demos/session.tabs
//! ```

mod args;
mod commands;
mod console;
mod router;
mod workspace;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use tabshell_core::{LogFormat, LoggingConfig, config};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::load_from_file(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    init_logging(&config.logging, cli.verbose);

    router::route(cli, config)
}

/// RUST_LOG wins over the configured level; `--verbose` forces debug
fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { logging.level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
