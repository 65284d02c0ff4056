use std::io::{self, Write};

use anyhow::{Context, Result};
use budget_cli::{AppConfig, Cli, execute, logging};
use clap::Parser;
use tracing::debug;

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    logging::init_logging(&config.log_level, config.log_file.as_deref())?;
    debug!(?config, "Starting");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&config, cli.command, &mut out)?;
    out.flush().context("Failed to write output")
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
