//! Command-line interface for flightops.
//!
//! The same command tree serves one-shot invocations and lines typed into
//! the interactive shell.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AdminCommand, AircraftCommand, AircraftDetails, AirportCommand, AirportDetails,
    AvailableArgs, ConfigCommand, FlightChanges, FlightCommand, NewFlightArgs, PilotCommand,
    ReportCommand, SearchArgs,
};

use crate::logging::Verbosity;

/// flightops - Flight operations records and crew scheduling
///
/// Keeps aircraft, airports, pilots and flights in a local database and
/// checks every crew assignment against overlapping flights and the rolling
/// 28-day duty-hour cap.
#[derive(Debug, Parser)]
#[command(name = "flightops")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// One line typed into the interactive shell.
#[derive(Debug, Parser)]
#[command(name = "flightops", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage flights and their crew
    #[command(subcommand)]
    Flights(FlightCommand),

    /// Manage pilots and query availability
    #[command(subcommand)]
    Pilots(PilotCommand),

    /// Manage airports
    #[command(subcommand)]
    Airports(AirportCommand),

    /// Manage the fleet
    #[command(subcommand)]
    Aircraft(AircraftCommand),

    /// Produce reports
    #[command(subcommand)]
    Report(ReportCommand),

    /// Initialise, seed or inspect the database
    #[command(subcommand)]
    Admin(AdminCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Start an interactive shell
    Shell,
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
