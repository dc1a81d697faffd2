//! `flightops` - CLI for the flight-operations record keeper
//!
//! Runs a single command against the configured database, or starts the
//! interactive shell.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;

use flightops::app::run_config;
use flightops::cli::{Cli, Command};
use flightops::{init_logging, shell, App, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    let mut stdout = std::io::stdout();

    // Configuration commands work without a database
    if let Command::Config(cmd) = cli.command {
        return run_config(&config, cmd, &mut stdout).map_err(Into::into);
    }

    let database = config.database_path();
    let app = App::open(config)
        .with_context(|| format!("opening database {}", database.display()))?;

    match cli.command {
        Command::Shell => shell::run(&app).context("interactive shell")?,
        command => app.execute(command, &mut stdout)?,
    }
    Ok(())
}
